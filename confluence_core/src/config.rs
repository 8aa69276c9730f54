use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::ConfluenceError;
use crate::ConfluenceResult;

/// Literal text that opens a placeholder.
pub const DEFAULT_PLACEHOLDER_START: &str = "<!-- include ";

/// Literal text that closes a placeholder.
pub const DEFAULT_PLACEHOLDER_END: &str = " -->";

/// Longest filename that will be captured before a match attempt is
/// abandoned.
pub const DEFAULT_MAX_FILENAME_LENGTH: usize = 512;

/// Default number of bytes read from the upstream input per chunk (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"confluence.toml",
	".confluence.toml",
	".config/confluence.toml",
];

/// Shape of the placeholder token.
///
/// A placeholder is `start`, a double-quoted filename, then `end`. With the
/// defaults this is `<!-- include "path/to/file" -->`.
///
/// ```toml
/// [placeholder]
/// start = "{{> "
/// end = " }}"
/// max_filename_length = 256
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlaceholderOptions {
	/// Literal prefix. May be empty.
	pub start: String,
	/// Literal suffix that follows the closing quote. May be empty.
	pub end: String,
	/// Filenames longer than this are passed through as literal text and the
	/// resolver is never asked for them.
	pub max_filename_length: usize,
}

impl Default for PlaceholderOptions {
	fn default() -> Self {
		Self {
			start: DEFAULT_PLACEHOLDER_START.to_string(),
			end: DEFAULT_PLACEHOLDER_END.to_string(),
			max_filename_length: DEFAULT_MAX_FILENAME_LENGTH,
		}
	}
}

impl PlaceholderOptions {
	/// Check that the options describe a usable placeholder.
	pub fn validate(&self) -> ConfluenceResult<()> {
		if self.max_filename_length == 0 {
			return Err(ConfluenceError::InvalidMaxFilenameLength);
		}

		Ok(())
	}
}

/// Configuration loaded from a `confluence.toml` file.
///
/// ```toml
/// chunk_size = 65536
///
/// [placeholder]
/// start = "<!-- include "
/// end = " -->"
/// max_filename_length = 512
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ConfluenceConfig {
	/// Placeholder delimiters and capture bound.
	#[serde(default)]
	pub placeholder: PlaceholderOptions,
	/// Number of bytes read from the upstream input per chunk when piping.
	/// Defaults to 64 KiB.
	#[serde(default = "default_chunk_size")]
	pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
	DEFAULT_CHUNK_SIZE
}

impl Default for ConfluenceConfig {
	fn default() -> Self {
		Self {
			placeholder: PlaceholderOptions::default(),
			chunk_size: DEFAULT_CHUNK_SIZE,
		}
	}
}

impl ConfluenceConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> ConfluenceResult<Option<ConfluenceConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::from_file(&config_path).map(Some)
	}

	/// Load and validate the config stored at `path`.
	pub fn from_file(path: &Path) -> ConfluenceResult<ConfluenceConfig> {
		let content = std::fs::read_to_string(path)?;
		let config = Self::from_toml(&content)?;
		tracing::debug!(path = %path.display(), "loaded config");

		Ok(config)
	}

	/// Parse and validate a config from TOML text.
	pub fn from_toml(content: &str) -> ConfluenceResult<ConfluenceConfig> {
		let config: ConfluenceConfig =
			toml::from_str(content).map_err(|e| ConfluenceError::ConfigParse(e.to_string()))?;
		config.validate()?;

		Ok(config)
	}

	pub fn validate(&self) -> ConfluenceResult<()> {
		if self.chunk_size == 0 {
			return Err(ConfluenceError::InvalidChunkSize);
		}

		self.placeholder.validate()
	}
}
