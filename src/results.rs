use std::path::PathBuf;
use std::time::Duration;

use crate::error::IndexError;

/// The output of a completed indexing run.
#[derive(Debug)]
pub struct IndexResult {
    /// Wall-clock time from worker start to the last worker joining.
    /// Enumeration is not included.
    pub elapsed: Duration,

    /// Sum of the sizes of every file that was indexed.
    pub total_bytes: u64,

    /// Number of documents this run added to the store.
    pub documents: usize,

    /// Per-file failures that were skipped over.
    /// Always empty under [`FailurePolicy::Abort`](crate::FailurePolicy::Abort).
    pub skipped: Vec<IndexError>,
}

impl IndexResult {
    pub(crate) fn empty() -> Self {
        Self {
            elapsed: Duration::ZERO,
            total_bytes: 0,
            documents: 0,
            skipped: Vec::new(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Indexing throughput, clamped to 0 on zero-duration runs.
    pub fn bytes_per_sec(&self) -> u64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.total_bytes as f64 / secs) as u64
        } else {
            0
        }
    }
}

/// A single ranked search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub path: PathBuf,

    /// Sum of the document's frequencies over every query term.
    pub frequency: u64,
}

/// The output of a search.
#[derive(Debug)]
pub struct SearchResult {
    pub elapsed: Duration,

    /// Every matching document, highest aggregate frequency first.
    /// Equal frequencies are ordered by document id.
    pub hits: Vec<SearchHit>,
}

impl SearchResult {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// The best `n` hits, or all of them if there are fewer.
    pub fn top(&self, n: usize) -> &[SearchHit] {
        &self.hits[..n.min(self.hits.len())]
    }
}
