use std::path::Path;
use std::path::PathBuf;

use derive_more::Deref;
use derive_more::DerefMut;

use crate::Directive;
use crate::DirectiveKind;
use crate::Document;
use crate::FenceTracker;
use crate::Fragment;
use crate::MergeError;
use crate::MergeOptions;
use crate::MergeResult;
use crate::SourceId;
use crate::document::split_terminator;
use crate::scan_line;
use crate::strip_metadata;

/// The documents currently being expanded, outermost first. Paths are
/// canonical so that different spellings of one file compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct InclusionChain(Vec<PathBuf>);

impl InclusionChain {
	pub fn new() -> Self {
		Self::default()
	}

	/// Render the chain as `a -> b -> c`, optionally followed by `next`.
	pub fn render(&self, next: Option<&Path>) -> String {
		let mut parts: Vec<String> = self.iter().map(|path| path.display().to_string()).collect();
		if let Some(next) = next {
			parts.push(next.display().to_string());
		}

		if parts.is_empty() {
			"the command line".to_string()
		} else {
			parts.join(" -> ")
		}
	}
}

/// Per-merge expansion state: the options, the active inclusion chain and
/// whether any document has contributed to the output yet.
#[derive(Debug)]
pub struct ExpansionContext<'a> {
	options: &'a MergeOptions,
	chain: InclusionChain,
	emitted_any: bool,
}

impl<'a> ExpansionContext<'a> {
	pub fn new(options: &'a MergeOptions) -> Self {
		Self {
			options,
			chain: InclusionChain::new(),
			emitted_any: false,
		}
	}

	pub fn chain(&self) -> &InclusionChain {
		&self.chain
	}

	/// Whether a document has already contributed to the merge. Every
	/// document expanded after the first has its metadata stripped.
	pub fn has_emitted(&self) -> bool {
		self.emitted_any
	}

	/// Load and expand the file at `path`, tracking it on the inclusion
	/// chain.
	pub fn expand_file(&mut self, path: &Path) -> MergeResult<String> {
		self.enter(path)?;
		let result = self.load(path).and_then(|document| self.expand(&document));
		self.chain.pop();
		result
	}

	/// Expand a document the caller already loaded, tracking its path on the
	/// inclusion chain when it came from a file.
	pub fn expand_loaded(&mut self, document: &Document) -> MergeResult<String> {
		let SourceId::Path(path) = document.source() else {
			return self.expand(document);
		};

		self.enter(path)?;
		let result = self.expand(document);
		self.chain.pop();
		result
	}

	/// Expand every directive in `document`, recursively.
	pub fn expand(&mut self, document: &Document) -> MergeResult<String> {
		let is_first = !self.emitted_any;
		self.emitted_any = true;
		let document = strip_metadata(document, is_first);

		tracing::debug!(
			source = %document.source(),
			depth = self.chain.len(),
			"expanding document"
		);

		let mut output = String::new();
		let mut fences = FenceTracker::new();

		for line in document.lines() {
			let state = fences.observe(line);
			if state.is_delimiter {
				output.push_str(line);
				continue;
			}

			self.expand_line(line, &document, state.in_fence, &mut output)?;
		}

		Ok(output)
	}

	fn expand_line(
		&mut self,
		line: &str,
		document: &Document,
		in_fence: bool,
		output: &mut String,
	) -> MergeResult<()> {
		let (content, terminator) = split_terminator(line);
		let fragments = scan_line(content, self.options);
		let last = fragments.len().saturating_sub(1);
		let directive_only = matches!(fragments.as_slice(), [Fragment::Directive(_)]);

		for (index, fragment) in fragments.into_iter().enumerate() {
			match fragment {
				Fragment::Literal(text) => output.push_str(text),
				Fragment::Directive(directive) => {
					if in_fence && !directive.kind.penetrates_fences() {
						output.push_str(&content[directive.span.clone()]);
						continue;
					}

					let mut expanded =
						self.resolve(&directive, document.base_dir(), in_fence, directive_only)?;
					if directive_only && expanded.is_empty() {
						return Ok(());
					}
					// A directive ending its line hands its final newline to
					// the line terminator.
					if index == last && !terminator.is_empty() && expanded.ends_with('\n') {
						expanded.pop();
					}
					output.push_str(&expanded);
				}
			}
		}

		output.push_str(terminator);
		Ok(())
	}

	/// Resolve one directive to the text that replaces it. Code includes are
	/// fenced only when they stand alone on a line outside a fence.
	fn resolve(
		&mut self,
		directive: &Directive,
		base_dir: &Path,
		in_fence: bool,
		standalone: bool,
	) -> MergeResult<String> {
		let target = base_dir.join(&directive.path);
		tracing::debug!(
			kind = %directive.kind,
			path = %target.display(),
			depth = self.chain.len(),
			"resolving directive"
		);

		self.enter(&target)?;
		let result = self.load(&target).and_then(|document| {
			if directive.kind.is_expandable() && !in_fence {
				self.expand(&document)
			} else if directive.kind == DirectiveKind::CodeInclude && !in_fence && standalone {
				Ok(wrap_in_fence(&document.text()))
			} else {
				Ok(document.text())
			}
		});
		self.chain.pop();
		result
	}

	/// Load a document that was just entered. Any failure to read it is
	/// reported against the documents that include it.
	fn load(&self, path: &Path) -> MergeResult<Document> {
		Document::load(path).map_err(|error| {
			match error {
				MergeError::Io(_) => {
					let parents = self.chain.split_last().map_or(&[][..], |(_, rest)| rest);
					MergeError::SourceNotFound {
						path: path.display().to_string(),
						chain: InclusionChain(parents.to_vec()).render(None),
					}
				}
				error => error,
			}
		})
	}

	/// Push `path` onto the inclusion chain, failing when it cannot be found
	/// or is already being expanded.
	fn enter(&mut self, path: &Path) -> MergeResult<()> {
		let canonical = std::fs::canonicalize(path).map_err(|_| {
			MergeError::SourceNotFound {
				path: path.display().to_string(),
				chain: self.chain.render(None),
			}
		})?;

		if self.chain.contains(&canonical) {
			return Err(MergeError::InclusionCycle {
				path: path.display().to_string(),
				chain: self.chain.render(Some(&canonical)),
			});
		}

		self.chain.push(canonical);
		Ok(())
	}
}

/// Wrap code in a tilde fence longer than any tilde run it already starts a
/// line with.
pub fn wrap_in_fence(code: &str) -> String {
	let longest = code
		.lines()
		.map(|line| line.trim_start().chars().take_while(|&c| c == '~').count())
		.max()
		.unwrap_or(0);
	let fence = "~".repeat(longest.max(2) + 1);

	let mut wrapped = String::with_capacity(code.len() + fence.len() * 2 + 3);
	wrapped.push_str(&fence);
	wrapped.push('\n');
	wrapped.push_str(code);
	if !code.is_empty() && !code.ends_with('\n') {
		wrapped.push('\n');
	}
	wrapped.push_str(&fence);
	wrapped.push('\n');
	wrapped
}
