//! Index ("book") files: documents whose lines name the files to merge.
//!
//! Three dialects are understood:
//!
//! - an implicit index built from several command line inputs,
//! - mmd_merge indexes, marked by a leading `#merge` line, where `#` starts a
//!   comment and indentation deepens the headings of the listed file,
//! - LeanPub `book.txt` files, optionally starting with `frontmatter:` and
//!   split by `mainmatter:` / `backmatter:` section markers.

use std::path::Path;
use std::path::PathBuf;

use crate::Directive;
use crate::DirectiveKind;
use crate::Document;
use crate::MergeOptions;
use crate::MergeResult;
use crate::Source;
use crate::SourceId;
use crate::has_directive;

/// File name that LeanPub treats as the book index.
pub const LEANPUB_BOOK_FILE: &str = "book.txt";

const LEANPUB_SECTION_MARKERS: [&str; 3] = ["frontmatter:", "mainmatter:", "backmatter:"];

/// Spaces equivalent to one tab of index indentation.
const INDENT_WIDTH: usize = 4;

/// One file listed in an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
	/// The entry as an [`DirectiveKind::IndexEntryRef`] directive.
	pub directive: Directive,
	/// Directory the entry path is resolved against.
	pub base_dir: PathBuf,
	/// Heading levels added to the merged file.
	pub level: usize,
}

impl IndexEntry {
	/// The entry path resolved against the index directory.
	pub fn resolved_path(&self) -> PathBuf {
		self.base_dir.join(&self.directive.path)
	}
}

/// Decide whether the primary input is an index. Only the primary input can
/// ever be one.
pub fn is_index(sources: &[Source], options: &MergeOptions) -> MergeResult<bool> {
	match sources {
		[] => Ok(false),
		[primary] => Ok(is_index_document(&Document::from_source(primary)?, options)),
		_ => Ok(true),
	}
}

/// Whether a single primary document is an index: standard input under
/// `--book`, a `book.txt` under `--leanpub`, or any document that starts
/// with an index marker.
pub fn is_index_document(document: &Document, options: &MergeOptions) -> bool {
	let forced = match document.source() {
		SourceId::Stdin => options.book,
		SourceId::Path(path) => options.leanpub && is_leanpub_book(path),
	};

	forced || has_index_marker(document)
}

/// Whether `path` is named `book.txt`, ignoring case.
pub fn is_leanpub_book(path: &Path) -> bool {
	path.file_name()
		.and_then(|name| name.to_str())
		.is_some_and(|name| name.eq_ignore_ascii_case(LEANPUB_BOOK_FILE))
}

/// Whether the first meaningful line is an mmd_merge (`#merge`) or LeanPub
/// (`frontmatter:`) index marker. Blank lines and `#` comments before the
/// marker are skipped.
pub fn has_index_marker(document: &Document) -> bool {
	for line in document.lines().iter().map(|line| line.trim()) {
		if line.is_empty() {
			continue;
		}
		if is_mmd_merge_marker(line) || line == LEANPUB_SECTION_MARKERS[0] {
			return true;
		}
		if is_index_comment(line) {
			continue;
		}
		break;
	}

	false
}

/// Build an implicit index from a list of files, in order.
pub fn implicit_index_entries(sources: &[Source]) -> Vec<IndexEntry> {
	sources
		.iter()
		.filter_map(|source| {
			match source {
				Source::File(path) => Some(path),
				Source::Stdin { .. } => None,
			}
		})
		.map(|path| {
			let text = path.to_string_lossy().into_owned();
			IndexEntry {
				directive: Directive::new(DirectiveKind::IndexEntryRef, text.clone(), 0..text.len()),
				base_dir: PathBuf::new(),
				level: 0,
			}
		})
		.collect()
}

/// Read the entries of an index document in order.
pub fn resolve_index_entries(document: &Document, options: &MergeOptions) -> Vec<IndexEntry> {
	let mut entries = Vec::new();

	for line in document.lines() {
		let line = line.trim_end_matches(['\n', '\r']);
		let path = line.trim();

		if path.is_empty() || is_index_comment(path) || LEANPUB_SECTION_MARKERS.contains(&path) {
			continue;
		}

		if has_directive(path, options) {
			tracing::warn!(
				source = %document.source(),
				line = path,
				"skipping directive in index file; index entries must be bare paths"
			);
			continue;
		}

		let start = line.len() - line.trim_start().len();
		entries.push(IndexEntry {
			directive: Directive::new(DirectiveKind::IndexEntryRef, path, start..start + path.len()),
			base_dir: document.base_dir().to_path_buf(),
			level: indentation_level(line),
		});
	}

	entries
}

/// Count indentation levels: one per tab or per four spaces. Spaces short
/// of a full level are ignored.
pub fn indentation_level(line: &str) -> usize {
	let mut level = 0;
	let mut spaces = 0;

	for c in line.chars() {
		match c {
			'\t' => {
				level += 1;
				spaces = 0;
			}
			' ' => {
				spaces += 1;
				if spaces == INDENT_WIDTH {
					level += 1;
					spaces = 0;
				}
			}
			_ => break,
		}
	}

	level
}

fn is_index_comment(line: &str) -> bool {
	line.starts_with('#')
}

fn is_mmd_merge_marker(line: &str) -> bool {
	line.strip_prefix('#')
		.is_some_and(|rest| rest.trim_start() == "merge")
}
