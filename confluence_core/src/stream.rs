use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;

use crate::ConfluenceConfig;
use crate::ConfluenceError;
use crate::ConfluenceResult;
use crate::DEFAULT_CHUNK_SIZE;
use crate::EmptyResolver;
use crate::Engine;
use crate::PlaceholderOptions;
use crate::Resolver;
use crate::Segment;

/// Streaming include transformer.
///
/// Input is written chunk by chunk; literal text is forwarded to the output as
/// soon as it is known not to belong to a placeholder, and every placeholder
/// is replaced by the content its [`Resolver`] supplies. Only one resolution
/// is ever outstanding, so replacements appear in document order.
///
/// ```rust
/// use confluence_core::Confluence;
/// use confluence_core::Replacement;
/// use confluence_core::ResolveError;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let resolver = |filename: &str| {
/// 	let content = format!("[{filename}]");
/// 	async move { Ok::<_, ResolveError>(Replacement::from(content)) }
/// };
///
/// let mut stream = Confluence::new(resolver);
/// let mut output: Vec<u8> = Vec::new();
/// stream.write(b"a <!-- incl", &mut output).await.unwrap();
/// stream.write(b"ude \"b.md\" --> c", &mut output).await.unwrap();
/// stream.end(&mut output).await.unwrap();
///
/// assert_eq!(output, b"a [b.md] c");
/// # });
/// ```
#[derive(Debug)]
pub struct Confluence<R> {
	engine: Engine,
	resolver: R,
	chunk_size: usize,
}

impl Default for Confluence<EmptyResolver> {
	fn default() -> Self {
		Self::new(EmptyResolver)
	}
}

impl<R: Resolver> Confluence<R> {
	/// Create a stream with the default `<!-- include "…" -->` placeholder.
	pub fn new(resolver: R) -> Self {
		Self {
			engine: Engine::default(),
			resolver,
			chunk_size: DEFAULT_CHUNK_SIZE,
		}
	}

	pub fn with_options(options: &PlaceholderOptions, resolver: R) -> ConfluenceResult<Self> {
		Ok(Self {
			engine: Engine::from_options(options)?,
			resolver,
			chunk_size: DEFAULT_CHUNK_SIZE,
		})
	}

	pub fn with_config(config: &ConfluenceConfig, resolver: R) -> ConfluenceResult<Self> {
		config.validate()?;

		Ok(Self {
			engine: Engine::from_options(&config.placeholder)?,
			resolver,
			chunk_size: config.chunk_size,
		})
	}

	pub fn engine(&self) -> &Engine {
		&self.engine
	}

	pub fn resolver(&self) -> &R {
		&self.resolver
	}

	pub fn into_resolver(self) -> R {
		self.resolver
	}

	/// Transform one chunk of input.
	///
	/// Returns once the chunk has been fully scanned and every placeholder it
	/// completed has been replaced. Bytes that may still begin a placeholder
	/// are held until the next call or [`end`](Self::end).
	pub async fn write<W>(&mut self, chunk: impl AsRef<[u8]>, output: &mut W) -> ConfluenceResult<()>
	where
		W: AsyncWrite + Unpin + ?Sized,
	{
		let chunk = chunk.as_ref();
		tracing::trace!(len = chunk.len(), "transform chunk");
		self.engine.push(chunk)?;

		loop {
			let segment = self.engine.next_segment()?;

			match segment {
				Segment::Exhausted { literal } => {
					let written = output.write_all(literal).await;
					return written.map_err(|e| self.halt(ConfluenceError::Output(e)));
				}
				Segment::Placeholder { literal, filename } => {
					let filename = String::from_utf8_lossy(filename).into_owned();
					let written = output.write_all(literal).await;
					written.map_err(|e| self.halt(ConfluenceError::Output(e)))?;

					self.include(&filename, output).await?;
					self.engine.complete_replacement()?;
				}
			}
		}
	}

	/// Signal end of input. Any held-back partial placeholder is written
	/// verbatim and the output is flushed.
	pub async fn end<W>(&mut self, output: &mut W) -> ConfluenceResult<()>
	where
		W: AsyncWrite + Unpin + ?Sized,
	{
		let remainder = self.engine.finish()?;

		if !remainder.is_empty() {
			tracing::debug!(len = remainder.len(), "flushing unresolved partial match");
		}

		let flushed = async {
			output.write_all(&remainder).await?;
			output.flush().await
		}
		.await;

		flushed.map_err(|e| self.halt(ConfluenceError::Output(e)))
	}

	/// Drive the stream from an upstream reader until end-of-file, then call
	/// [`end`](Self::end). Returns the number of bytes read.
	#[tracing::instrument(level = "debug", skip_all, fields(chunk_size = self.chunk_size))]
	pub async fn pipe<I, W>(&mut self, mut input: I, output: &mut W) -> ConfluenceResult<u64>
	where
		I: AsyncRead + Unpin,
		W: AsyncWrite + Unpin + ?Sized,
	{
		let mut buffer = vec![0; self.chunk_size];
		let mut total = 0;

		loop {
			let read = match input.read(&mut buffer).await {
				Ok(0) => break,
				Ok(read) => read,
				Err(e) => return Err(self.abort(e)),
			};

			total += read as u64;
			self.write(&buffer[..read], output).await?;
		}

		self.end(output).await?;
		tracing::debug!(bytes = total, "input exhausted");

		Ok(total)
	}

	/// Report an upstream failure. The stream halts and the returned error
	/// should be propagated to whoever consumes the output.
	pub fn abort(&mut self, error: std::io::Error) -> ConfluenceError {
		self.halt(ConfluenceError::Upstream(error))
	}

	async fn include<W>(&mut self, filename: &str, output: &mut W) -> ConfluenceResult<()>
	where
		W: AsyncWrite + Unpin + ?Sized,
	{
		tracing::debug!(filename, "resolving placeholder");

		let replacement = match self.resolver.resolve(filename).await {
			Ok(replacement) => replacement,
			Err(source) => {
				return Err(self.halt(ConfluenceError::Resolve {
					filename: filename.to_string(),
					source,
				}));
			}
		};

		match replacement.forward(filename, output).await {
			Ok(bytes) => {
				tracing::debug!(filename, bytes, "placeholder replaced");
				Ok(())
			}
			Err(e) => Err(self.halt(e)),
		}
	}

	fn halt(&mut self, error: ConfluenceError) -> ConfluenceError {
		tracing::debug!(%error, "halting stream");
		self.engine.halt();
		error
	}
}

/// Transform an in-memory input with the default placeholder.
pub async fn transform<R: Resolver>(input: impl AsRef<[u8]>, resolver: R) -> ConfluenceResult<Vec<u8>> {
	let mut stream = Confluence::new(resolver);
	let mut output = Vec::new();
	stream.write(input, &mut output).await?;
	stream.end(&mut output).await?;

	Ok(output)
}
