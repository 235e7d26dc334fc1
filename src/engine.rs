use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::error::IndexError;
use crate::results::{IndexResult, SearchHit, SearchResult};
use crate::store::{DocumentId, IndexStore};
use crate::traits::{FileSource, SizeOracle, Tokenizer};

// ---------------------------------------------------------------------------
// FailurePolicy
// ---------------------------------------------------------------------------

/// What an indexing run does with a per-file failure.
///
/// Per-file failures are the recoverable ones: a file that cannot be opened
/// or read, a file whose size can no longer be queried, a directory entry the
/// source could not visit. Fatal errors end the run under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Leave the file out of the index and record the error in
    /// [`IndexResult::skipped`].
    #[default]
    Skip,

    /// Stop the run and return the first error.
    Abort,
}

// ---------------------------------------------------------------------------
// ProcessingEngine
// ---------------------------------------------------------------------------

/// Parallel indexer and conjunctive searcher over one [`IndexStore`].
///
/// Built via [`parindex::engine()`](crate::engine()).
pub struct ProcessingEngine {
    store:     Arc<IndexStore>,
    source:    Arc<dyn FileSource>,
    tokenizer: Arc<dyn Tokenizer>,
    sizes:     Arc<dyn SizeOracle>,
    workers:   usize,
    policy:    FailurePolicy,
}

impl ProcessingEngine {
    pub(crate) fn new(
        store: Arc<IndexStore>,
        source: Arc<dyn FileSource>,
        tokenizer: Arc<dyn Tokenizer>,
        sizes: Arc<dyn SizeOracle>,
        workers: usize,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            store,
            source,
            tokenizer,
            sizes,
            workers: workers.max(1),
            policy,
        }
    }

    /// Configured number of indexing workers.
    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// The store this engine indexes into and searches.
    pub fn store(&self) -> &Arc<IndexStore> {
        &self.store
    }

    /// Index every file below `root`.
    ///
    /// Files are dealt round-robin to `min(workers, files)` threads. Each
    /// thread tokenizes its files one at a time and commits each one to the
    /// store as a new document. Blocks until every worker has joined.
    ///
    /// # Errors
    ///
    /// Fatal source errors (e.g. a missing root) and worker panics always
    /// fail the run. Per-file failures fail it only under
    /// [`FailurePolicy::Abort`]. Documents committed before the failure stay
    /// in the store.
    pub fn index_folder(&self, root: impl AsRef<Path>) -> Result<IndexResult, IndexError> {
        let root = root.as_ref();

        let mut skipped = Vec::new();
        let mut files = Vec::new();
        for entry in self.source.files(root) {
            match entry {
                Ok(path) => files.push(path),
                Err(e) if e.is_recoverable() && self.policy == FailurePolicy::Skip => {
                    warn!(error = %e, "skipping unreadable entry");
                    skipped.push(e);
                }
                Err(e) => return Err(e),
            }
        }

        if files.is_empty() {
            debug!(root = %root.display(), "nothing to index");
            return Ok(IndexResult {
                skipped,
                ..IndexResult::empty()
            });
        }

        let file_count = files.len();
        let batches = partition(files, self.workers);

        // Shared state across workers
        let total_bytes = AtomicU64::new(0);
        let documents   = AtomicUsize::new(0);
        let stop        = AtomicBool::new(false);
        let skipped     = Mutex::new(skipped);

        let start = Instant::now();

        let outcomes: Vec<Result<(), IndexError>> = thread::scope(|scope| {
            let worker = Worker {
                engine:      self,
                total_bytes: &total_bytes,
                documents:   &documents,
                skipped:     &skipped,
                stop:        &stop,
            };

            let handles: Vec<_> = batches
                .into_iter()
                .enumerate()
                .map(move |(n, batch)| scope.spawn(move || worker.run(n, batch)))
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(n, handle)| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(IndexError::WorkerPanicked(n)))
                })
                .collect()
        });

        let elapsed = start.elapsed();

        if let Some(err) = outcomes.into_iter().find_map(Result::err) {
            error!(root = %root.display(), error = %err, "indexing aborted");
            return Err(err);
        }

        let result = IndexResult {
            elapsed,
            total_bytes: total_bytes.into_inner(),
            documents:   documents.into_inner(),
            skipped:     skipped.into_inner().unwrap_or_else(PoisonError::into_inner),
        };

        info!(
            root = %root.display(),
            files = file_count,
            documents = result.documents,
            bytes = result.total_bytes,
            skipped = result.skipped.len(),
            workers = self.workers.min(file_count),
            elapsed_secs = result.elapsed_secs(),
            "indexing complete"
        );

        Ok(result)
    }

    /// Documents containing every one of `terms`, ranked.
    ///
    /// A document's score is the sum of its frequencies over the query terms.
    /// Hits are sorted by descending score, ties by ascending document id.
    /// A repeated term counts once per occurrence, so it both doubles its
    /// contribution and still has to match. An empty query matches nothing.
    pub fn search<S: AsRef<str>>(&self, terms: &[S]) -> SearchResult {
        let start = Instant::now();

        // document -> (aggregate frequency, matched terms)
        let mut tally: HashMap<DocumentId, (u64, usize)> = HashMap::new();
        for term in terms {
            for posting in self.store.lookup_index(term.as_ref()) {
                let entry = tally.entry(posting.document).or_default();
                entry.0 += posting.frequency;
                entry.1 += 1;
            }
        }

        let mut ranked: Vec<(DocumentId, u64)> = tally
            .into_iter()
            .filter(|&(_, (_, matched))| matched == terms.len())
            .map(|(id, (frequency, _))| (id, frequency))
            .collect();

        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let hits: Vec<SearchHit> = ranked
            .into_iter()
            .filter_map(|(id, frequency)| {
                self.store
                    .get_document(id)
                    .map(|path| SearchHit { path, frequency })
            })
            .collect();

        let elapsed = start.elapsed();
        debug!(terms = terms.len(), hits = hits.len(), ?elapsed, "search complete");

        SearchResult { elapsed, hits }
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

/// Borrowed view of the run state handed to each indexing thread.
#[derive(Clone, Copy)]
struct Worker<'a> {
    engine:      &'a ProcessingEngine,
    total_bytes: &'a AtomicU64,
    documents:   &'a AtomicUsize,
    skipped:     &'a Mutex<Vec<IndexError>>,
    stop:        &'a AtomicBool,
}

impl Worker<'_> {
    fn run(self, n: usize, batch: Vec<PathBuf>) -> Result<(), IndexError> {
        debug!(worker = n, files = batch.len(), "worker started");

        for path in batch {
            // Another worker aborted the run
            if self.stop.load(Ordering::Relaxed) {
                debug!(worker = n, "worker stopping early");
                return Ok(());
            }

            if let Err(e) = self.index_file(&path) {
                match self.engine.policy {
                    FailurePolicy::Skip => {
                        warn!(worker = n, error = %e, "skipping file");
                        self.skipped
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push(e);
                    }
                    FailurePolicy::Abort => {
                        self.stop.store(true, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }
        }

        debug!(worker = n, "worker finished");
        Ok(())
    }

    /// Tokenize one file and commit it as a document.
    ///
    /// The size is queried before anything is committed, so a failed file
    /// leaves no trace in the store.
    fn index_file(&self, path: &Path) -> Result<(), IndexError> {
        let engine = self.engine;
        let frequencies = count_terms(engine.tokenizer.as_ref(), path)?;
        let size = engine
            .sizes
            .size(path)
            .map_err(|source| IndexError::SizeUnavailable {
                path: path.to_path_buf(),
                source,
            })?;

        let id = engine.store.put_document(path);
        engine.store.update_index(id, frequencies);

        self.total_bytes.fetch_add(size, Ordering::Relaxed);
        self.documents.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Term frequencies of one file, read line by line.
///
/// Lines are decoded lossily so non-UTF-8 content still yields its text.
fn count_terms(tokenizer: &dyn Tokenizer, path: &Path) -> Result<HashMap<String, u64>, IndexError> {
    let unreadable = |source: io::Error| IndexError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = BufReader::new(File::open(path).map_err(unreadable)?);
    let mut counts = HashMap::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).map_err(unreadable)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        for term in tokenizer.terms(&line) {
            *counts.entry(term).or_insert(0) += 1;
        }
    }

    Ok(counts)
}

/// Deal `items` round-robin into `min(workers, items.len())` batches.
/// Relative order is preserved within each batch.
fn partition<T>(items: Vec<T>, workers: usize) -> Vec<Vec<T>> {
    let n = workers.max(1).min(items.len());
    let mut batches: Vec<Vec<T>> = (0..n).map(|_| Vec::new()).collect();
    for (i, item) in items.into_iter().enumerate() {
        batches[i % n].push(item);
    }
    batches
}
