use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::ExportTarget;
use crate::MergeError;
use crate::MergeResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["mdmerge.toml", ".mdmerge.toml", ".config/mdmerge.toml"];

/// Options controlling a single merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct MergeOptions {
	/// Treat standard input as an index file.
	pub book: bool,
	/// Extension used to resolve wildcard (`.*`) paths. `None` leaves
	/// wildcard paths untouched.
	pub export_target: Option<ExportTarget>,
	/// Leave `{{…}}` transclusions for a downstream processor.
	pub ignore_transclusions: bool,
	/// Only expand raw includes.
	pub just_raw: bool,
	/// Treat any primary input named `book.txt` as an index file.
	pub leanpub: bool,
}

/// Configuration loaded from an `mdmerge.toml` file.
///
/// ```toml
/// export_target = "latex"
/// leanpub = true
/// ignore_transclusions = false
/// just_raw = false
/// ```
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct MergeConfig {
	/// Default export target when none is given on the command line.
	#[serde(default)]
	pub export_target: Option<ExportTarget>,
	#[serde(default)]
	pub leanpub: bool,
	#[serde(default)]
	pub ignore_transclusions: bool,
	#[serde(default)]
	pub just_raw: bool,
}

impl MergeConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is no config file.
	pub fn load(root: &Path) -> MergeResult<Option<MergeConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: MergeConfig = toml::from_str(&content).map_err(|e| {
			MergeError::ConfigParse {
				path: config_path.display().to_string(),
				reason: e.to_string(),
			}
		})?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	/// Fold the config into options gathered from the command line. Flags
	/// are enabled when either side enables them; an export target already
	/// present in `options` wins over the configured one.
	#[must_use]
	pub fn apply(&self, options: MergeOptions) -> MergeOptions {
		MergeOptions {
			book: options.book,
			export_target: options.export_target.or(self.export_target),
			ignore_transclusions: options.ignore_transclusions || self.ignore_transclusions,
			just_raw: options.just_raw || self.just_raw,
			leanpub: options.leanpub || self.leanpub,
		}
	}
}
