use std::io;
use std::pin::Pin;
use std::task::Context;
use std::task::Poll;

use tokio::io::AsyncRead;
use tokio::io::AsyncWrite;
use tokio::io::ReadBuf;

use crate::Confluence;
use crate::ConfluenceResult;
use crate::PlaceholderOptions;
use crate::Replacement;
use crate::ResolveError;
use crate::Resolver;

pub const PLACEHOLDER: &str = r#"<!-- include "filename" -->"#;
pub const SAMPLE: &str = r#"foo <!-- include "filename" --> bar"#;

/// Records every filename it is asked for and answers with `reply`.
#[derive(Debug)]
pub struct RecordingResolver {
	pub calls: Vec<String>,
	reply: fn(&str) -> Replacement,
}

impl RecordingResolver {
	pub fn new(reply: fn(&str) -> Replacement) -> Self {
		Self {
			calls: vec![],
			reply,
		}
	}

	pub fn empty() -> Self {
		Self::new(|_| Replacement::Empty)
	}

	pub fn bracketed() -> Self {
		Self::new(|filename| Replacement::from(format!("[{filename}]")))
	}
}

impl Resolver for RecordingResolver {
	async fn resolve(&mut self, filename: &str) -> Result<Replacement, ResolveError> {
		self.calls.push(filename.to_string());
		Ok((self.reply)(filename))
	}
}

/// Yields `data` once, then fails every later read.
#[derive(Debug)]
pub struct FailingReader {
	data: &'static [u8],
	sent: bool,
}

impl FailingReader {
	pub fn new(data: &'static [u8]) -> Self {
		Self { data, sent: false }
	}
}

impl AsyncRead for FailingReader {
	fn poll_read(
		mut self: Pin<&mut Self>,
		_cx: &mut Context<'_>,
		buf: &mut ReadBuf<'_>,
	) -> Poll<io::Result<()>> {
		if self.sent {
			return Poll::Ready(Err(io::Error::other("reader broke")));
		}

		self.sent = true;
		buf.put_slice(self.data);
		Poll::Ready(Ok(()))
	}
}

/// A writer that rejects every write.
#[derive(Debug, Default)]
pub struct BrokenWriter;

impl AsyncWrite for BrokenWriter {
	fn poll_write(
		self: Pin<&mut Self>,
		_cx: &mut Context<'_>,
		_buf: &[u8],
	) -> Poll<io::Result<usize>> {
		Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed")))
	}

	fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
		Poll::Ready(Ok(()))
	}

	fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
		Poll::Ready(Ok(()))
	}
}

/// Feed `chunks` through a fresh stream and collect the output.
pub async fn run_chunks<R: Resolver>(
	options: &PlaceholderOptions,
	chunks: &[&[u8]],
	resolver: R,
) -> ConfluenceResult<(Vec<u8>, R)> {
	let mut stream = Confluence::with_options(options, resolver)?;
	let mut output = Vec::new();

	for chunk in chunks {
		stream.write(chunk, &mut output).await?;
	}

	stream.end(&mut output).await?;

	Ok((output, stream.into_resolver()))
}

/// Split `input` at every position in `splits` (ascending) and run it.
pub async fn run_split<R: Resolver>(
	input: &str,
	splits: &[usize],
	resolver: R,
) -> ConfluenceResult<(String, R)> {
	let bytes = input.as_bytes();
	let mut chunks = Vec::with_capacity(splits.len() + 1);
	let mut start = 0;

	for &split in splits {
		chunks.push(&bytes[start..split]);
		start = split;
	}

	chunks.push(&bytes[start..]);

	let (output, resolver) = run_chunks(&PlaceholderOptions::default(), &chunks, resolver).await?;

	Ok((String::from_utf8_lossy(&output).into_owned(), resolver))
}

/// Inputs made of a broken placeholder followed by an unfinished one, so no
/// complete placeholder ever appears.
pub fn broken_placeholders() -> Vec<String> {
	(1..PLACEHOLDER.len())
		.map(|index| format!("{}x{}", &PLACEHOLDER[..index - 1], &PLACEHOLDER[..index]))
		.collect()
}

/// The placeholder with an `x` or a `<` inserted at every position inside its
/// delimiters, plus a doubled opening `<`.
pub fn corrupted_placeholders() -> Vec<String> {
	let start_len = PlaceholderOptions::default().start.len();
	let closing_quote = PLACEHOLDER.rfind('"').unwrap_or_default();
	let positions: Vec<usize> = (1..=start_len)
		.chain(closing_quote + 1..PLACEHOLDER.len())
		.collect();

	['x', '<']
		.into_iter()
		.flat_map(|unit| {
			positions
				.iter()
				.map(move |&index| format!("{}{unit}{}", &PLACEHOLDER[..index], &PLACEHOLDER[index..]))
		})
		.chain([format!("<{PLACEHOLDER}")])
		.collect()
}
