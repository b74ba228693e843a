use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum MergeError {
	#[error(transparent)]
	#[diagnostic(code(mdmerge::io_error))]
	Io(#[from] std::io::Error),

	#[error("source not found: `{path}` (included from {chain})")]
	#[diagnostic(
		code(mdmerge::source_not_found),
		help("check the directive path; relative paths resolve against the including file's directory")
	)]
	SourceNotFound { path: String, chain: String },

	#[error("inclusion cycle: `{path}` is already being merged ({chain})")]
	#[diagnostic(
		code(mdmerge::inclusion_cycle),
		help("remove the directive that includes a file from inside itself")
	)]
	InclusionCycle { path: String, chain: String },

	#[error("`{path}` is not valid UTF-8 text")]
	#[diagnostic(code(mdmerge::encoding), help("convert the file to UTF-8"))]
	Encoding { path: String },

	#[error("failed to parse config file `{path}`: {reason}")]
	#[diagnostic(
		code(mdmerge::config_parse),
		help("check that the file is valid TOML with `export_target`, `leanpub`, `ignore_transclusions` or `just_raw` keys")
	)]
	ConfigParse { path: String, reason: String },

	#[error("invalid output file `{path}`: {reason}")]
	#[diagnostic(code(mdmerge::invalid_output))]
	InvalidOutput { path: String, reason: String },

	#[error("standard input (`-`) cannot be combined with other input files")]
	#[diagnostic(
		code(mdmerge::stdin_with_files),
		help("pass either a single `-` or a list of files")
	)]
	StdinWithFiles,
}

pub type MergeResult<T> = Result<T, MergeError>;
pub type AnyEmptyResult = Result<(), Box<dyn std::error::Error>>;
