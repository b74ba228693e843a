use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use crate::MergeError;
use crate::MergeResult;

/// Where a document's text came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceId {
	Path(PathBuf),
	Stdin,
}

impl fmt::Display for SourceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Path(path) => write!(f, "{}", path.display()),
			Self::Stdin => f.write_str("<stdin>"),
		}
	}
}

/// A top-level input handed to [`merge`](crate::merge).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
	/// A file on disk.
	File(PathBuf),
	/// Text already read from standard input. Relative directive paths
	/// resolve against `base_dir`.
	Stdin { content: String, base_dir: PathBuf },
}

impl Source {
	pub fn is_stdin(&self) -> bool {
		matches!(self, Self::Stdin { .. })
	}
}

/// An immutable sequence of lines read from one source. Every line keeps its
/// `\n` terminator except possibly the last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
	source: SourceId,
	base_dir: PathBuf,
	lines: Vec<String>,
}

impl Document {
	/// Build a document from text. CRLF line endings are normalized to LF.
	pub fn from_text(source: SourceId, base_dir: impl Into<PathBuf>, text: &str) -> Self {
		let text = normalize_line_endings(text);
		let lines = text.split_inclusive('\n').map(str::to_string).collect();

		Self {
			source,
			base_dir: base_dir.into(),
			lines,
		}
	}

	/// Read a document from disk. The file must exist and contain UTF-8 text.
	pub fn load(path: &Path) -> MergeResult<Self> {
		let bytes = std::fs::read(path)?;
		let text = String::from_utf8(bytes).map_err(|_| {
			MergeError::Encoding {
				path: path.display().to_string(),
			}
		})?;
		let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
		tracing::debug!(path = %path.display(), "loaded document");

		Ok(Self::from_text(SourceId::Path(path.to_path_buf()), base_dir, &text))
	}

	/// Build the document for a top-level [`Source`].
	pub fn from_source(source: &Source) -> MergeResult<Self> {
		match source {
			Source::File(path) => Self::load(path),
			Source::Stdin { content, base_dir } => {
				Ok(Self::from_text(SourceId::Stdin, base_dir.clone(), content))
			}
		}
	}

	pub fn source(&self) -> &SourceId {
		&self.source
	}

	/// Directory against which relative directive paths resolve.
	pub fn base_dir(&self) -> &Path {
		&self.base_dir
	}

	pub fn lines(&self) -> &[String] {
		&self.lines
	}

	/// A copy of this document without its first `count` lines.
	#[must_use]
	pub fn without_leading_lines(&self, count: usize) -> Self {
		Self {
			source: self.source.clone(),
			base_dir: self.base_dir.clone(),
			lines: self.lines.iter().skip(count).cloned().collect(),
		}
	}

	/// The document's full text.
	pub fn text(&self) -> String {
		self.lines.concat()
	}
}

/// Normalize CRLF line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n")
	} else {
		content.to_string()
	}
}

/// Split a line into its content and its terminator (`"\n"` or `""`).
pub fn split_terminator(line: &str) -> (&str, &str) {
	match line.strip_suffix('\n') {
		Some(content) => (content, "\n"),
		None => (line, ""),
	}
}
