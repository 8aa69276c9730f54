use miette::Diagnostic;
use thiserror::Error;

use crate::EngineState;

/// Error type returned by a [`Resolver`](crate::Resolver) when it cannot
/// supply content for a placeholder.
pub type ResolveError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ConfluenceError {
	#[error(transparent)]
	#[diagnostic(code(confluence::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to read from the upstream input")]
	#[diagnostic(code(confluence::upstream))]
	Upstream(#[source] std::io::Error),

	#[error("failed to write to the output")]
	#[diagnostic(code(confluence::output))]
	Output(#[source] std::io::Error),

	#[error("failed to resolve content for placeholder `{filename}`")]
	#[diagnostic(
		code(confluence::resolve),
		help("check that `{filename}` exists and is readable from the resolver root")
	)]
	Resolve {
		filename: String,
		#[source]
		source: ResolveError,
	},

	#[error("replacement content for placeholder `{filename}` failed while streaming")]
	#[diagnostic(code(confluence::replacement))]
	Replacement {
		filename: String,
		#[source]
		source: std::io::Error,
	},

	#[error("stream engine is {actual:?} but the operation requires {expected:?}")]
	#[diagnostic(code(confluence::invalid_state))]
	InvalidState {
		expected: EngineState,
		actual: EngineState,
	},

	#[error("stream halted after an earlier error")]
	#[diagnostic(
		code(confluence::halted),
		help("create a new stream instance; a failed stream cannot be resumed")
	)]
	Halted,

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(confluence::config_parse),
		help("check that confluence.toml is valid TOML with an optional [placeholder] section")
	)]
	ConfigParse(String),

	#[error("`max_filename_length` must be greater than zero")]
	#[diagnostic(code(confluence::invalid_max_filename_length))]
	InvalidMaxFilenameLength,

	#[error("`chunk_size` must be greater than zero")]
	#[diagnostic(code(confluence::invalid_chunk_size))]
	InvalidChunkSize,
}

pub type ConfluenceResult<T> = Result<T, ConfluenceError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
