use crate::Document;
use crate::ExpansionContext;
use crate::FenceTracker;
use crate::InclusionChain;
use crate::IndexEntry;
use crate::MergeError;
use crate::MergeOptions;
use crate::MergeResult;
use crate::Source;
use crate::implicit_index_entries;
use crate::is_index_document;
use crate::resolve_index_entries;

/// The deepest heading level Markdown renderers support.
pub const MAX_HEADING_LEVEL: usize = 6;

/// Merge `sources` into a single document.
///
/// A single source is merged on its own unless it is an index, in which case
/// the files it lists are merged in order. Several sources form an implicit
/// index. Any failure aborts the whole merge and no text is returned.
pub fn merge(sources: &[Source], options: &MergeOptions) -> MergeResult<String> {
	let mut ctx = ExpansionContext::new(options);

	match sources {
		[] => Ok(String::new()),
		[primary] => {
			let document = load_primary(primary)?;
			if is_index_document(&document, options) {
				let entries = resolve_index_entries(&document, options);
				return merge_entries(&mut ctx, &entries);
			}

			ctx.expand_loaded(&document)
		}
		_ => {
			if sources.iter().any(Source::is_stdin) {
				return Err(MergeError::StdinWithFiles);
			}
			merge_entries(&mut ctx, &implicit_index_entries(sources))
		}
	}
}

/// Load the primary input, reporting an unreadable file as a missing source.
fn load_primary(source: &Source) -> MergeResult<Document> {
	Document::from_source(source).map_err(|error| {
		match (error, source) {
			(MergeError::Io(_), Source::File(path)) => {
				MergeError::SourceNotFound {
					path: path.display().to_string(),
					chain: InclusionChain::new().render(None),
				}
			}
			(error, _) => error,
		}
	})
}

/// Merge index entries in order, one blank line between consecutive files.
pub fn merge_entries(ctx: &mut ExpansionContext<'_>, entries: &[IndexEntry]) -> MergeResult<String> {
	let mut output = String::new();

	for (position, entry) in entries.iter().enumerate() {
		let merged = ctx.expand_file(&entry.resolved_path())?;
		let merged = bump_headings(&merged, entry.level);

		if position > 0 {
			if !output.is_empty() && !output.ends_with('\n') {
				output.push('\n');
			}
			output.push('\n');
		}
		output.push_str(&merged);
	}

	Ok(output)
}

/// Deepen every ATX heading outside fenced code blocks by `level`.
pub fn bump_headings(text: &str, level: usize) -> String {
	if level == 0 {
		return text.to_string();
	}

	let prefix = "#".repeat(level);
	let mut fences = FenceTracker::new();
	let mut output = String::with_capacity(text.len());

	for line in text.split_inclusive('\n') {
		if fences.observe(line).in_fence {
			output.push_str(line);
			continue;
		}

		match heading_level(line) {
			Some(current) => {
				if current + level > MAX_HEADING_LEVEL {
					tracing::warn!(
						line = line.trim_end(),
						new_level = current + level,
						"heading level increased beyond {MAX_HEADING_LEVEL}"
					);
				}
				output.push_str(&prefix);
				output.push_str(line);
			}
			None => output.push_str(line),
		}
	}

	output
}

/// The level of an ATX heading line (`#`, `##`, … followed by whitespace).
pub fn heading_level(line: &str) -> Option<usize> {
	let hashes = line.chars().take_while(|&c| c == '#').count();
	let rest = &line[hashes..];
	(hashes > 0 && rest.starts_with([' ', '\t'])).then_some(hashes)
}
