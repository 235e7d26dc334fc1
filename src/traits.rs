use std::io;
use std::path::{Path, PathBuf};

use crate::error::IndexError;

/// Enumerates the files an indexing run should cover.
///
/// Implement this to index anything addressable by path, such as a directory tree,
/// a manifest, a fixed list handed over by another tool.
///
/// # Object Safety
///
/// `FileSource` is object-safe. The engine stores it as `Arc<dyn FileSource>`,
/// so `files()` returns a boxed iterator rather than `impl Iterator`.
///
/// # Error Handling
///
/// Yield `Err` for entries that cannot be visited (permission denied,
/// symlink loops). Whether the run continues past them is decided by the
/// engine's [`FailurePolicy`](crate::FailurePolicy). A missing root should be
/// yielded as [`IndexError::NotFound`], which always ends the run.
///
/// # Example
///
/// ```rust
/// use std::path::{Path, PathBuf};
/// use parindex::{FileSource, IndexError};
///
/// struct ListSource(Vec<PathBuf>);
///
/// impl FileSource for ListSource {
///     fn files(&self, _root: &Path) -> Box<dyn Iterator<Item = Result<PathBuf, IndexError>>> {
///         Box::new(self.0.clone().into_iter().map(Ok::<_, IndexError>))
///     }
/// }
/// ```
pub trait FileSource: Send + Sync {
    /// Regular files under `root`, in a stable order.
    fn files(&self, root: &Path) -> Box<dyn Iterator<Item = Result<PathBuf, IndexError>>>;
}

/// Splits one line of text into index terms.
///
/// `Send + Sync` are required, since one tokenizer is shared by every indexing
/// worker.
pub trait Tokenizer: Send + Sync {
    /// Normalized terms of `line`, lazily.
    fn terms<'a>(&'a self, line: &'a str) -> Box<dyn Iterator<Item = String> + 'a>;
}

/// Reports file sizes for throughput accounting.
pub trait SizeOracle: Send + Sync {
    /// Size of the file at `path` in bytes. Fails if the file no longer exists.
    fn size(&self, path: &Path) -> io::Result<u64>;
}
