//! `confluence_core` splices external content into a text stream wherever an
//! include placeholder appears, without ever buffering the whole input.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Input chunks
//!   → Engine (feeds bytes to the Matcher, holds partial matches across chunk boundaries)
//!   → Matcher (start literal → quote → filename capture → quote → end literal)
//!   → Resolver (maps each captured filename to replacement content)
//!   → Output (literal spans and replacements, strictly in document order)
//! ```
//!
//! ## Key Types
//!
//! - [`Matcher`]: A caller-driven state machine that classifies one byte at
//!   a time.
//! - [`Engine`]: The sans-IO scanning loop with explicit suspend/resume
//!   states.
//! - [`Confluence`]: The asynchronous stream that wires an [`Engine`] to a
//!   [`Resolver`] and a `tokio` writer.
//! - [`Replacement`]: Text, bytes, a reader, or nothing.
//! - [`ConfluenceConfig`]: Configuration loaded from `confluence.toml`.
//!
//! Malformed placeholders are never errors: a broken delimiter or an
//! over-long filename is passed through as ordinary text.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use confluence_core::Confluence;
//! use confluence_core::FsResolver;
//!
//! # async fn run() -> confluence_core::ConfluenceResult<()> {
//! let input = tokio::fs::File::open("page.html").await?;
//! let mut output = tokio::fs::File::create("page.out.html").await?;
//!
//! let mut stream = Confluence::new(FsResolver::new("partials"));
//! stream.pipe(input, &mut output).await?;
//! # Ok(())
//! # }
//! ```

pub use config::*;
pub use engine::*;
pub use error::*;
pub use matcher::*;
pub use replacement::*;
pub use resolver::*;
pub use stream::*;

pub mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
mod matcher;
mod replacement;
mod resolver;
mod stream;

#[cfg(test)]
mod __fixtures;
