use std::future::Future;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::Replacement;
use crate::ResolveError;

/// Supplies replacement content for a captured filename.
///
/// The stream awaits the returned future before scanning any further, so
/// placeholders are resolved one at a time in document order. The future
/// must eventually complete; a future that never resolves stalls the stream.
pub trait Resolver {
	fn resolve(&mut self, filename: &str) -> impl Future<Output = Result<Replacement, ResolveError>>;
}

impl<F, Fut> Resolver for F
where
	F: FnMut(&str) -> Fut,
	Fut: Future<Output = Result<Replacement, ResolveError>>,
{
	fn resolve(&mut self, filename: &str) -> impl Future<Output = Result<Replacement, ResolveError>> {
		self(filename)
	}
}

/// Removes every placeholder from the stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyResolver;

impl Resolver for EmptyResolver {
	async fn resolve(&mut self, _filename: &str) -> Result<Replacement, ResolveError> {
		Ok(Replacement::Empty)
	}
}

/// Streams the file at `root/filename` into the placeholder's position.
///
/// Filenames must stay inside `root`: absolute paths and `..` components are
/// refused with [`io::ErrorKind::PermissionDenied`].
#[derive(Debug, Clone)]
pub struct FsResolver {
	root: PathBuf,
}

impl FsResolver {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}
}

impl Resolver for FsResolver {
	async fn resolve(&mut self, filename: &str) -> Result<Replacement, ResolveError> {
		let relative = Path::new(filename);
		let escapes_root = relative
			.components()
			.any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));

		if escapes_root {
			return Err(io::Error::new(
				io::ErrorKind::PermissionDenied,
				format!("`{filename}` is outside of `{}`", self.root.display()),
			)
			.into());
		}

		let path = self.root.join(relative);
		tracing::debug!(path = %path.display(), "opening include");
		let file = tokio::fs::File::open(&path).await?;

		Ok(Replacement::reader(file))
	}
}
