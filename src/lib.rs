//! # parindex
//!
//! Parallel in-memory inverted index — concurrent indexing, conjunctive ranked search.
//!
//! parindex owns the shared [`IndexStore`], the indexing pipeline that fills it
//! from a directory tree with a fixed number of worker threads, and the
//! multi-term search that ranks documents by aggregate term frequency. It does
//! **not** own command parsing or output formatting; those belong to the
//! caller. Directory traversal, tokenization and size accounting sit behind
//! traits ([`FileSource`], [`Tokenizer`], [`SizeOracle`]) with filesystem
//! defaults.
//!
//! # Quick Start
//!
//! ```rust
//! use std::fs;
//!
//! let dir = tempfile::tempdir().unwrap();
//! fs::write(dir.path().join("a.txt"), "alpha beta alpha").unwrap();
//! fs::write(dir.path().join("b.txt"), "alpha").unwrap();
//!
//! let engine = parindex::engine().workers(2).build();
//!
//! let indexed = engine.index_folder(dir.path()).unwrap();
//! assert_eq!(indexed.documents, 2);
//! assert_eq!(indexed.total_bytes, 21);
//!
//! let found = engine.search(&["alpha", "beta"]);
//! assert_eq!(found.hits.len(), 1);
//! assert_eq!(found.hits[0].frequency, 3);
//! assert!(found.hits[0].path.ends_with("a.txt"));
//!
//! println!("Search completed in {:.6}s", found.elapsed_secs());
//! ```
//!
//! # Custom Collaborators
//!
//! Implement [`Tokenizer`] to change what counts as a term:
//!
//! ```rust
//! use parindex::Tokenizer;
//!
//! struct Whitespace;
//!
//! impl Tokenizer for Whitespace {
//!     fn terms<'a>(&'a self, line: &'a str) -> Box<dyn Iterator<Item = String> + 'a> {
//!         Box::new(line.split_whitespace().map(str::to_string))
//!     }
//! }
//!
//! let engine = parindex::engine().tokenizer(Whitespace).build();
//! assert!(engine.search(&["anything"]).hits.is_empty());
//! ```

#![forbid(unsafe_code)]

mod builder;
mod engine;
mod error;
mod results;
mod source;
mod store;
mod tokenizer;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::EngineBuilder;
pub use engine::{FailurePolicy, ProcessingEngine};
pub use error::IndexError;
pub use results::{IndexResult, SearchHit, SearchResult};
pub use source::{DirectorySource, FsSizeOracle};
pub use store::{DocumentId, IndexStore, Posting};
pub use tokenizer::{Terms, WordTokenizer, MIN_TERM_LEN};
pub use traits::{FileSource, SizeOracle, Tokenizer};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`EngineBuilder`] to configure a [`ProcessingEngine`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use parindex::IndexStore;
///
/// let store = Arc::new(IndexStore::new());
/// let engine = parindex::engine()
///     .workers(4)
///     .store(Arc::clone(&store))
///     .build();
///
/// assert_eq!(engine.worker_count(), 4);
/// assert_eq!(store.document_count(), 0);
/// ```
pub fn engine() -> EngineBuilder {
    EngineBuilder::default()
}
