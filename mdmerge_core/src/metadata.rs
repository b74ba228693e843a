//! Leading metadata detection and removal.
//!
//! Two header conventions are recognized at the very start of a document:
//!
//! - MultiMarkdown metadata: `Key: value` lines, optionally followed by
//!   indented continuation lines, ended by a blank line.
//! - YAML front matter: a `---` line, the YAML body, then a `---` or `...`
//!   line.
//!
//! A header that is never terminated is not metadata and is left alone.

use crate::Document;

/// Return `document` with its leading metadata block removed, unless it is
/// the first document contributed to the merge.
pub fn strip_metadata(document: &Document, is_first: bool) -> Document {
	if is_first {
		return document.clone();
	}

	match metadata_len(document.lines()) {
		Some(count) => {
			tracing::debug!(source = %document.source(), lines = count, "stripped metadata");
			document.without_leading_lines(count)
		}
		None => document.clone(),
	}
}

/// Number of leading lines forming a metadata block (separator included), or
/// `None` when the document does not start with one.
pub fn metadata_len(lines: &[String]) -> Option<usize> {
	let first = lines.first()?;
	if is_yaml_delimiter(first) {
		yaml_front_matter_len(lines)
	} else {
		multimarkdown_metadata_len(lines)
	}
}

fn multimarkdown_metadata_len(lines: &[String]) -> Option<usize> {
	if !is_metadata_line(&lines[0]) {
		return None;
	}

	for (index, line) in lines.iter().enumerate().skip(1) {
		if is_blank(line) {
			return Some(index + 1);
		}
		if !is_metadata_line(line) && !is_continuation_line(line) {
			return None;
		}
	}

	None
}

/// The closing `---` or `...` must come before the first blank line.
fn yaml_front_matter_len(lines: &[String]) -> Option<usize> {
	let close = lines
		.iter()
		.enumerate()
		.skip(1)
		.find(|(_, line)| is_blank(line) || is_yaml_delimiter(line) || is_yaml_terminator(line))
		.filter(|(_, line)| !is_blank(line))
		.map(|(index, _)| index)?;

	let separator = lines.get(close + 1).is_some_and(|line| is_blank(line));
	Some(close + 1 + usize::from(separator))
}

/// A `Key: value` line. The key starts with an ASCII alphanumeric and may
/// contain alphanumerics, spaces, tabs, `_` and `-`; the value is non-blank.
pub fn is_metadata_line(line: &str) -> bool {
	let line = line.trim();
	let Some((key, value)) = line.split_once(':') else {
		return false;
	};

	let mut key_chars = key.chars();
	let valid_key = key_chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
		&& key_chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '\t' | '_' | '-'));

	valid_key && value.starts_with([' ', '\t']) && !value.trim().is_empty()
}

fn is_continuation_line(line: &str) -> bool {
	line.starts_with([' ', '\t']) && !is_blank(line)
}

fn is_blank(line: &str) -> bool {
	line.trim().is_empty()
}

fn is_yaml_delimiter(line: &str) -> bool {
	line.trim_end() == "---"
}

fn is_yaml_terminator(line: &str) -> bool {
	line.trim_end() == "..."
}
