/// Result of observing one line with a [`FenceTracker`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FenceState {
	/// The line is inside a fenced code block (delimiters included).
	pub in_fence: bool,
	/// The line is an opening or closing fence delimiter.
	pub is_delimiter: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenFence {
	character: char,
	length: usize,
}

/// Tracks Markdown fenced code block boundaries across the lines of one
/// document. Create a fresh tracker per document scan.
#[derive(Debug, Default)]
pub struct FenceTracker {
	open: Option<OpenFence>,
}

impl FenceTracker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether the tracker is currently inside a fence.
	pub fn in_fence(&self) -> bool {
		self.open.is_some()
	}

	/// Feed the next line (with or without its terminator) and report its
	/// fence state.
	pub fn observe(&mut self, line: &str) -> FenceState {
		let line = line.trim_end_matches(['\n', '\r']);

		if let Some(open) = self.open {
			if is_closing_fence(line, open) {
				self.open = None;
				return FenceState {
					in_fence: true,
					is_delimiter: true,
				};
			}

			return FenceState {
				in_fence: true,
				is_delimiter: false,
			};
		}

		if let Some(open) = opening_fence(line) {
			self.open = Some(open);
			return FenceState {
				in_fence: true,
				is_delimiter: true,
			};
		}

		FenceState::default()
	}
}

/// Strip up to three leading spaces, the indentation allowed before a fence.
fn strip_fence_indent(line: &str) -> Option<&str> {
	let indent = line.len() - line.trim_start_matches(' ').len();
	(indent <= 3).then(|| &line[indent..])
}

/// Detect an opening fence: three or more backticks or tildes, optionally
/// followed by an info string. Backtick info strings may not contain
/// backticks.
fn opening_fence(line: &str) -> Option<OpenFence> {
	let stripped = strip_fence_indent(line)?;
	let character = stripped.chars().next()?;
	if character != '`' && character != '~' {
		return None;
	}

	let length = stripped.chars().take_while(|&c| c == character).count();
	if length < 3 {
		return None;
	}

	let info = &stripped[length..];
	if character == '`' && info.contains('`') {
		return None;
	}

	Some(OpenFence { character, length })
}

/// Detect a closing fence for `open`: the same character, at least as many
/// of them, and nothing else but whitespace.
fn is_closing_fence(line: &str, open: OpenFence) -> bool {
	let Some(stripped) = strip_fence_indent(line) else {
		return false;
	};
	let length = stripped.chars().take_while(|&c| c == open.character).count();
	length >= open.length && stripped[length..].trim().is_empty()
}
