use std::fmt;
use std::pin::Pin;

use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;

use crate::ConfluenceError;
use crate::ConfluenceResult;

/// Size of the buffer used to copy a [`Replacement::Reader`] downstream.
const COPY_BUFFER_SIZE: usize = 8 * 1024;

/// Content supplied by a [`Resolver`](crate::Resolver) for one placeholder.
#[derive(Default)]
pub enum Replacement {
	/// Delete the placeholder.
	#[default]
	Empty,
	Text(String),
	Bytes(Vec<u8>),
	/// Content streamed from a reader. Reaching end-of-file completes the
	/// replacement.
	Reader(Pin<Box<dyn AsyncRead + Send>>),
}

impl Replacement {
	pub fn reader(reader: impl AsyncRead + Send + 'static) -> Self {
		Self::Reader(Box::pin(reader))
	}

	pub fn is_empty(&self) -> bool {
		match self {
			Self::Empty => true,
			Self::Text(text) => text.is_empty(),
			Self::Bytes(bytes) => bytes.is_empty(),
			Self::Reader(_) => false,
		}
	}

	/// Copy the replacement into `output`, returning the number of bytes
	/// written. Reader failures are attributed to `filename`.
	pub(crate) async fn forward<W>(self, filename: &str, output: &mut W) -> ConfluenceResult<u64>
	where
		W: AsyncWrite + Unpin + ?Sized,
	{
		match self {
			Self::Empty => Ok(0),
			Self::Text(text) => write_bytes(text.as_bytes(), output).await,
			Self::Bytes(bytes) => write_bytes(&bytes, output).await,
			Self::Reader(mut reader) => {
				let mut buffer = vec![0; COPY_BUFFER_SIZE];
				let mut written = 0;

				loop {
					let read = reader.read(&mut buffer).await.map_err(|source| {
						ConfluenceError::Replacement {
							filename: filename.to_string(),
							source,
						}
					})?;

					if read == 0 {
						return Ok(written);
					}

					output
						.write_all(&buffer[..read])
						.await
						.map_err(ConfluenceError::Output)?;
					written += read as u64;
				}
			}
		}
	}
}

async fn write_bytes<W>(bytes: &[u8], output: &mut W) -> ConfluenceResult<u64>
where
	W: AsyncWrite + Unpin + ?Sized,
{
	output
		.write_all(bytes)
		.await
		.map_err(ConfluenceError::Output)?;

	Ok(bytes.len() as u64)
}

impl fmt::Debug for Replacement {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Empty => f.write_str("Empty"),
			Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
			Self::Bytes(bytes) => f.debug_tuple("Bytes").field(bytes).finish(),
			Self::Reader(_) => f.write_str("Reader(..)"),
		}
	}
}

impl From<String> for Replacement {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}

impl From<&str> for Replacement {
	fn from(text: &str) -> Self {
		Self::Text(text.to_string())
	}
}

impl From<Vec<u8>> for Replacement {
	fn from(bytes: Vec<u8>) -> Self {
		Self::Bytes(bytes)
	}
}

impl From<&[u8]> for Replacement {
	fn from(bytes: &[u8]) -> Self {
		Self::Bytes(bytes.to_vec())
	}
}

impl<T: Into<Replacement>> From<Option<T>> for Replacement {
	fn from(content: Option<T>) -> Self {
		content.map_or(Self::Empty, Into::into)
	}
}
