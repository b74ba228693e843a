use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use mdmerge_cli::MdmergeCli;
use mdmerge_core::MergeConfig;
use mdmerge_core::MergeError;
use mdmerge_core::MergeOptions;
use mdmerge_core::Source;
use mdmerge_core::merge;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = MdmergeCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	if let Err(e) = run(&args) {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<MergeError>() {
			Ok(merge_err) => {
				let report: miette::Report = (*merge_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr so merged output on stdout stays clean. `RUST_LOG`
/// overrides the level chosen by `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.try_init()
		.ok();
}

fn run(args: &MdmergeCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
	let options = resolve_options(args, &root)?;
	tracing::debug!(?options, "resolved merge options");

	if let Some(outfile) = &args.outfile {
		validate_outfile(outfile)?;
	}

	let sources = read_sources(args, &root)?;
	let merged = merge(&sources, &options)?;

	match &args.outfile {
		Some(outfile) => {
			std::fs::write(outfile, &merged).map_err(MergeError::Io)?;
			tracing::debug!(path = %outfile.display(), bytes = merged.len(), "wrote merged document");
		}
		None => {
			let mut stdout = std::io::stdout().lock();
			stdout.write_all(merged.as_bytes())?;
			stdout.flush()?;
		}
	}

	Ok(())
}

/// Combine command line flags with `mdmerge.toml`, then fall back to the
/// default export target.
fn resolve_options(args: &MdmergeCli, root: &Path) -> Result<MergeOptions, MergeError> {
	let mut options = args.options();

	if !args.no_config {
		if let Some(config) = MergeConfig::load(root)? {
			options = config.apply(options);
		}
	}

	options.export_target = Some(options.export_target.unwrap_or_default());
	Ok(options)
}

fn read_sources(args: &MdmergeCli, root: &Path) -> Result<Vec<Source>, MergeError> {
	if !args.reads_stdin() {
		return Ok(args.inputs.iter().cloned().map(Source::File).collect());
	}

	if args.inputs.len() > 1 {
		return Err(MergeError::StdinWithFiles);
	}

	let mut content = String::new();
	std::io::stdin()
		.lock()
		.read_to_string(&mut content)
		.map_err(|error| {
			match error.kind() {
				ErrorKind::InvalidData => {
					MergeError::Encoding {
						path: "<stdin>".to_string(),
					}
				}
				_ => MergeError::Io(error),
			}
		})?;

	Ok(vec![Source::Stdin {
		content,
		base_dir: root.to_path_buf(),
	}])
}

/// The output file must be creatable: not a directory, inside an existing
/// directory.
fn validate_outfile(outfile: &Path) -> Result<(), MergeError> {
	let invalid = |reason: &str| {
		MergeError::InvalidOutput {
			path: outfile.display().to_string(),
			reason: reason.to_string(),
		}
	};

	if outfile.is_dir() {
		return Err(invalid("the path is a directory"));
	}

	let parent = outfile
		.parent()
		.filter(|parent| !parent.as_os_str().is_empty());
	if parent.is_some_and(|parent| !parent.is_dir()) {
		return Err(invalid("the parent directory does not exist"));
	}

	Ok(())
}
