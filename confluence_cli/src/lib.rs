use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use confluence_core::ConfluenceConfig;
use confluence_core::ConfluenceResult;

#[derive(Debug, Parser)]
#[command(
	author,
	version,
	about = "Expand include placeholders in a text stream.",
	long_about = "confluence reads a text stream and replaces every include placeholder with the \
	              contents of the file it names.\n\nBy default a placeholder looks like \
	              `<!-- include \"path/to/file\" -->`, and paths are resolved relative to the \
	              input file's directory. Malformed placeholders are copied through \
	              unchanged.\n\nExamples:\n  confluence page.html > out.html\n  cat page.html | \
	              confluence --root partials\n  confluence --placeholder-start '{{> ' \
	              --placeholder-end ' }}' page.txt"
)]
pub struct ConfluenceCli {
	/// File to read. Omit or pass `-` to read standard input.
	pub input: Option<PathBuf>,

	/// Write the result to this file instead of standard output.
	#[arg(long, short)]
	pub output: Option<PathBuf>,

	/// Directory that included filenames are resolved against. Defaults to
	/// the input file's directory, or the current directory for standard
	/// input. Absolute filenames and `..` components are refused.
	#[arg(long, short)]
	pub root: Option<PathBuf>,

	/// Explicit config file. When omitted, `confluence.toml`,
	/// `.confluence.toml` and `.config/confluence.toml` are searched in the
	/// root directory.
	#[arg(long, short)]
	pub config: Option<PathBuf>,

	/// Literal text that opens a placeholder.
	#[arg(long)]
	pub placeholder_start: Option<String>,

	/// Literal text that closes a placeholder.
	#[arg(long)]
	pub placeholder_end: Option<String>,

	/// Longest filename that will be resolved. Longer ones are copied
	/// through as text.
	#[arg(long)]
	pub max_filename_length: Option<usize>,

	/// Number of bytes read from the input at a time.
	#[arg(long)]
	pub chunk_size: Option<usize>,

	/// Enable verbose output.
	#[arg(long, short, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, default_value_t = false)]
	pub no_color: bool,
}

impl ConfluenceCli {
	/// The input file, or `None` when reading standard input.
	pub fn input_path(&self) -> Option<&Path> {
		self.input.as_deref().filter(|path| *path != Path::new("-"))
	}

	/// Directory that included filenames are resolved against.
	pub fn resolve_root(&self) -> PathBuf {
		if let Some(root) = &self.root {
			return root.clone();
		}

		self.input_path()
			.and_then(Path::parent)
			.filter(|parent| !parent.as_os_str().is_empty())
			.map_or_else(|| PathBuf::from("."), Path::to_path_buf)
	}

	/// Load the config file (explicit or discovered under `root`) and apply
	/// any flag overrides on top of it.
	pub fn resolve_config(&self, root: &Path) -> ConfluenceResult<ConfluenceConfig> {
		let mut config = match &self.config {
			Some(path) => ConfluenceConfig::from_file(path)?,
			None => ConfluenceConfig::load(root)?.unwrap_or_default(),
		};

		if let Some(start) = &self.placeholder_start {
			config.placeholder.start.clone_from(start);
		}

		if let Some(end) = &self.placeholder_end {
			config.placeholder.end.clone_from(end);
		}

		if let Some(max) = self.max_filename_length {
			config.placeholder.max_filename_length = max;
		}

		if let Some(chunk_size) = self.chunk_size {
			config.chunk_size = chunk_size;
		}

		config.validate()?;

		Ok(config)
	}
}
