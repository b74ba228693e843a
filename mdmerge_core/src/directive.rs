use std::fmt;
use std::ops::Range;

use serde::Deserialize;

/// Suffix that marks a wildcard extension in a directive path, e.g.
/// `{{diagram.*}}`.
pub const WILDCARD_EXTENSION: &str = ".*";

/// The reserved MultiMarkdown table-of-contents token. `{{TOC}}` is never a
/// transclusion.
pub const RESERVED_TOC: &str = "TOC";

/// The kinds of include directive understood by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
	/// MultiMarkdown transclusion: `{{path}}`.
	Transclusion,
	/// Marked file include: `<<[path]`.
	FileInclude,
	/// LeanPub / Marked code include: `<<(path)` or `<<[caption](path)`.
	CodeInclude,
	/// Marked raw include: `<<{path}`.
	RawInclude,
	/// A bare path line inside an index file.
	IndexEntryRef,
}

impl DirectiveKind {
	/// Whether the target of this directive is scanned for further
	/// directives.
	pub fn is_expandable(self) -> bool {
		matches!(self, Self::Transclusion | Self::FileInclude | Self::IndexEntryRef)
	}

	/// Whether the directive path is subject to wildcard extension
	/// substitution.
	pub fn supports_wildcard(self) -> bool {
		matches!(self, Self::Transclusion | Self::FileInclude)
	}

	/// Whether the directive is expanded when it appears inside a fenced code
	/// block.
	pub fn penetrates_fences(self) -> bool {
		!matches!(self, Self::RawInclude)
	}
}

impl fmt::Display for DirectiveKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Transclusion => "transclusion",
			Self::FileInclude => "file include",
			Self::CodeInclude => "code include",
			Self::RawInclude => "raw include",
			Self::IndexEntryRef => "index entry",
		};
		f.write_str(name)
	}
}

/// A recognized directive within a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
	pub kind: DirectiveKind,
	/// Target path as written, after wildcard substitution. Relative paths
	/// are resolved against the containing document's directory.
	pub path: String,
	/// Byte range of the matched text within the line.
	pub span: Range<usize>,
}

impl Directive {
	pub fn new(kind: DirectiveKind, path: impl Into<String>, span: Range<usize>) -> Self {
		Self {
			kind,
			path: path.into(),
			span,
		}
	}
}

/// The downstream renderer the merged document is destined for. Selects the
/// extension substituted for wildcard paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportTarget {
	#[default]
	Html,
	Latex,
	Lyx,
	Opml,
	Rtf,
	Odf,
}

impl ExportTarget {
	/// The file extension, including the leading dot.
	pub fn extension(self) -> &'static str {
		match self {
			Self::Html => ".html",
			Self::Latex => ".tex",
			Self::Lyx => ".lyx",
			Self::Opml => ".opml",
			Self::Rtf => ".rtf",
			Self::Odf => ".odf",
		}
	}
}

impl fmt::Display for ExportTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Html => "html",
			Self::Latex => "latex",
			Self::Lyx => "lyx",
			Self::Opml => "opml",
			Self::Rtf => "rtf",
			Self::Odf => "odf",
		};
		f.write_str(name)
	}
}

/// Replace a trailing `.*` with the export target's extension. Paths without
/// a wildcard, or with no export target set, are returned unchanged.
pub fn substitute_wildcard(path: &str, target: Option<ExportTarget>) -> String {
	match (path.strip_suffix(WILDCARD_EXTENSION), target) {
		(Some(stem), Some(target)) if !stem.is_empty() => {
			format!("{stem}{}", target.extension())
		}
		_ => path.to_string(),
	}
}
