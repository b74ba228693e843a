use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use mdmerge_core::ExportTarget;
use mdmerge_core::MergeOptions;

/// The input name that reads the document from standard input.
pub const STDIN_INPUT: &str = "-";

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Merge markdown documents into one by expanding include directives.",
	long_about = "mdmerge flattens a tree of markdown files into a single document.\n\nIt expands \
	              MultiMarkdown transclusions ({{path}}) and Marked / LeanPub includes \
	              (<<[path], <<(path), <<{path}) recursively, and merges the files listed in \
	              index files such as a LeanPub book.txt.\n\nExamples:\n  mdmerge chapter.md \
	              -o merged.md\n  mdmerge one.md two.md three.md\n  cat book.txt | mdmerge \
	              --book -"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct MdmergeCli {
	/// Files to merge, in order. Use `-` to read a single document from
	/// standard input.
	#[arg(required = true, num_args = 1..)]
	pub inputs: Vec<PathBuf>,

	/// Write the merged document to this file instead of standard output.
	#[arg(long, short)]
	pub outfile: Option<PathBuf>,

	/// Renderer the document is destined for. Selects the extension that
	/// replaces wildcard (`.*`) paths.
	#[arg(long, value_enum)]
	pub export_target: Option<ExportTargetArg>,

	/// Leave `{{path}}` transclusions for a downstream processor.
	#[arg(long, default_value_t = false)]
	pub ignore_transclusions: bool,

	/// Only expand raw includes (`<<{path}`).
	#[arg(long, default_value_t = false)]
	pub just_raw: bool,

	/// Treat a single input named `book.txt` as a LeanPub index file.
	#[arg(long, default_value_t = false)]
	pub leanpub: bool,

	/// Treat standard input as an index file.
	#[arg(long, default_value_t = false)]
	pub book: bool,

	/// Do not load `mdmerge.toml` from the working directory.
	#[arg(long, default_value_t = false)]
	pub no_config: bool,

	/// Enable verbose output.
	#[arg(long, short, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, default_value_t = false)]
	pub no_color: bool,
}

impl MdmergeCli {
	/// Merge options selected on the command line. The export target stays
	/// unset when the flag is absent so a config file can provide it.
	pub fn options(&self) -> MergeOptions {
		MergeOptions {
			book: self.book,
			export_target: self.export_target.map(ExportTarget::from),
			ignore_transclusions: self.ignore_transclusions,
			just_raw: self.just_raw,
			leanpub: self.leanpub,
		}
	}

	/// Whether any input is `-`.
	pub fn reads_stdin(&self) -> bool {
		self.inputs.iter().any(|input| input.as_os_str() == STDIN_INPUT)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportTargetArg {
	/// HTML output; wildcards resolve to `.html`.
	Html,
	/// LaTeX output; wildcards resolve to `.tex`.
	Latex,
	/// LyX output; wildcards resolve to `.lyx`.
	Lyx,
	/// OPML output; wildcards resolve to `.opml`.
	Opml,
	/// RTF output; wildcards resolve to `.rtf`.
	Rtf,
	/// OpenDocument output; wildcards resolve to `.odf`.
	Odf,
}

impl From<ExportTargetArg> for ExportTarget {
	fn from(value: ExportTargetArg) -> Self {
		match value {
			ExportTargetArg::Html => Self::Html,
			ExportTargetArg::Latex => Self::Latex,
			ExportTargetArg::Lyx => Self::Lyx,
			ExportTargetArg::Opml => Self::Opml,
			ExportTargetArg::Rtf => Self::Rtf,
			ExportTargetArg::Odf => Self::Odf,
		}
	}
}
