use std::ops::Range;

use crate::Directive;
use crate::DirectiveKind;
use crate::MergeOptions;
use crate::RESERVED_TOC;
use crate::substitute_wildcard;

const TRANSCLUSION_OPEN: &str = "{{";
const TRANSCLUSION_CLOSE: &str = "}}";
const INCLUDE_OPEN: &str = "<<";
const RAW_COMMENT_OPEN: &str = "<!-- ";
const RAW_COMMENT_CLOSE: &str = " -->";

/// A piece of a scanned line: literal text or a recognized directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment<'a> {
	Literal(&'a str),
	Directive(Directive),
}

/// Split `line` (without its terminator) into an ordered sequence of literal
/// and directive fragments. The fragments cover the whole line with no gaps
/// or overlaps. Tokens that look like directives but are malformed stay
/// literal text.
pub fn scan_line<'a>(line: &'a str, options: &MergeOptions) -> Vec<Fragment<'a>> {
	let mut fragments = Vec::new();
	let mut literal_start = 0;
	let mut search_from = 0;

	while search_from < line.len() {
		let Some(offset) = find_opener(&line[search_from..]) else {
			break;
		};
		let start = search_from + offset;

		let Some(directive) = match_directive(line, start, options) else {
			// Openers are ASCII, so one byte forward is a char boundary.
			search_from = start + 1;
			continue;
		};

		if literal_start < directive.span.start {
			fragments.push(Fragment::Literal(&line[literal_start..directive.span.start]));
		}
		literal_start = directive.span.end;
		search_from = directive.span.end;
		fragments.push(Fragment::Directive(directive));
	}

	if literal_start < line.len() {
		fragments.push(Fragment::Literal(&line[literal_start..]));
	}

	fragments
}

/// Whether the line contains at least one directive under `options`.
pub fn has_directive(line: &str, options: &MergeOptions) -> bool {
	scan_line(line, options)
		.iter()
		.any(|fragment| matches!(fragment, Fragment::Directive(_)))
}

/// Byte offset of the next `{{` or `<<` in `haystack`.
fn find_opener(haystack: &str) -> Option<usize> {
	haystack
		.as_bytes()
		.windows(2)
		.position(|pair| pair == b"{{" || pair == b"<<")
}

/// Try every directive form at `start`, preferring the longest match.
fn match_directive(line: &str, start: usize, options: &MergeOptions) -> Option<Directive> {
	let rest = &line[start..];

	if rest.starts_with(TRANSCLUSION_OPEN) {
		if options.just_raw || options.ignore_transclusions {
			return None;
		}
		return match_transclusion(line, start, options);
	}

	if !rest.starts_with(INCLUDE_OPEN) {
		return None;
	}

	match rest.as_bytes().get(INCLUDE_OPEN.len()).copied()? {
		b'[' if !options.just_raw => match_bracket_include(line, start, options),
		b'(' if !options.just_raw => {
			let (path, end) = enclosed(line, start + 3, ")")?;
			Some(Directive::new(DirectiveKind::CodeInclude, path, start..end))
		}
		b'{' => match_raw_include(line, start, options),
		_ => None,
	}
}

/// `{{path}}`, excluding the reserved `{{TOC}}`.
fn match_transclusion(line: &str, start: usize, options: &MergeOptions) -> Option<Directive> {
	let (path, end) = enclosed(line, start + TRANSCLUSION_OPEN.len(), TRANSCLUSION_CLOSE)?;
	if path == RESERVED_TOC || path.contains(['{', '}']) {
		return None;
	}

	Some(with_wildcard(DirectiveKind::Transclusion, path, start..end, options))
}

/// `<<[path]` or the LeanPub code form `<<[caption](path)`.
fn match_bracket_include(line: &str, start: usize, options: &MergeOptions) -> Option<Directive> {
	let open = start + 3;
	let close = open + line[open..].find(']')?;

	let after = &line[close + 1..];
	if after.starts_with('(') {
		if let Some((path, end)) = enclosed(line, close + 2, ")") {
			return Some(Directive::new(DirectiveKind::CodeInclude, path, start..end));
		}
	}

	let path = non_empty(&line[open..close])?;
	Some(with_wildcard(DirectiveKind::FileInclude, path, start..close + 1, options))
}

/// `<<{path}`. Under `--just-raw` an enclosing `<!-- … -->` comment is
/// consumed along with the directive.
fn match_raw_include(line: &str, start: usize, options: &MergeOptions) -> Option<Directive> {
	let (path, end) = enclosed(line, start + 3, "}")?;
	if path.contains('{') {
		return None;
	}

	let mut span = start..end;
	if options.just_raw
		&& line[..start].ends_with(RAW_COMMENT_OPEN)
		&& line[end..].starts_with(RAW_COMMENT_CLOSE)
	{
		span = start - RAW_COMMENT_OPEN.len()..end + RAW_COMMENT_CLOSE.len();
	}

	Some(Directive::new(DirectiveKind::RawInclude, path, span))
}

/// Build a directive, substituting the wildcard extension for kinds that
/// support it.
fn with_wildcard(
	kind: DirectiveKind,
	path: &str,
	span: Range<usize>,
	options: &MergeOptions,
) -> Directive {
	if kind.supports_wildcard() {
		Directive::new(kind, substitute_wildcard(path, options.export_target), span)
	} else {
		Directive::new(kind, path, span)
	}
}

/// Find `close` after `from` and return the trimmed, non-empty text between
/// together with the byte offset just past `close`.
fn enclosed<'a>(line: &'a str, from: usize, close: &str) -> Option<(&'a str, usize)> {
	let len = line[from..].find(close)?;
	let path = non_empty(&line[from..from + len])?;
	Some((path, from + len + close.len()))
}

fn non_empty(text: &str) -> Option<&str> {
	let trimmed = text.trim();
	(!trimmed.is_empty()).then_some(trimmed)
}
