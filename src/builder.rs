use std::sync::Arc;

use crate::engine::{FailurePolicy, ProcessingEngine};
use crate::source::{DirectorySource, FsSizeOracle};
use crate::store::IndexStore;
use crate::tokenizer::WordTokenizer;
use crate::traits::{FileSource, SizeOracle, Tokenizer};

// ---------------------------------------------------------------------------
// EngineBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring a [`ProcessingEngine`].
///
/// Created via [`parindex::engine()`](crate::engine()). Configure with chained
/// builder methods, then call [`build()`](EngineBuilder::build).
///
/// # Example
///
/// ```rust,ignore
/// let engine = parindex::engine()
///     .workers(8)
///     .store(shared_store)
///     .on_failure(FailurePolicy::Abort)
///     .build();
/// ```
pub struct EngineBuilder {
    store:     Option<Arc<IndexStore>>,
    source:    Option<Arc<dyn FileSource>>,
    tokenizer: Option<Arc<dyn Tokenizer>>,
    sizes:     Option<Arc<dyn SizeOracle>>,
    workers:   usize,
    policy:    FailurePolicy,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            store:     None,
            source:    None,
            tokenizer: None,
            sizes:     None,
            workers:   num_cpus(),
            policy:    FailurePolicy::default(),
        }
    }
}

impl EngineBuilder {
    // ── Parallelism ───────────────────────────────────────────────────────

    /// Number of indexing worker threads.
    ///
    /// Defaults to the number of logical CPU cores. `0` is treated as `1`.
    /// A run never starts more workers than it has files.
    pub fn workers(mut self, n: usize) -> Self {
        self.workers = n;
        self
    }

    // ── Store ─────────────────────────────────────────────────────────────

    /// Index into an existing store.
    ///
    /// Use this to share one store between several engines or to keep a
    /// handle for direct lookups. Defaults to a fresh, empty store.
    pub fn store(mut self, store: Arc<IndexStore>) -> Self {
        self.store = Some(store);
        self
    }

    // ── Collaborators ─────────────────────────────────────────────────────

    /// Set the file enumerator. Defaults to [`DirectorySource`].
    pub fn source(mut self, s: impl FileSource + 'static) -> Self {
        self.source = Some(Arc::new(s));
        self
    }

    /// Set the tokenizer. Defaults to [`WordTokenizer`].
    pub fn tokenizer(mut self, t: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Some(Arc::new(t));
        self
    }

    /// Set the size oracle used for byte accounting. Defaults to [`FsSizeOracle`].
    pub fn size_oracle(mut self, o: impl SizeOracle + 'static) -> Self {
        self.sizes = Some(Arc::new(o));
        self
    }

    // ── Failures ──────────────────────────────────────────────────────────

    /// How per-file failures are handled. Defaults to [`FailurePolicy::Skip`].
    pub fn on_failure(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    // ── Build ─────────────────────────────────────────────────────────────

    pub fn build(self) -> ProcessingEngine {
        ProcessingEngine::new(
            self.store.unwrap_or_default(),
            self.source.unwrap_or_else(|| Arc::new(DirectorySource::new())),
            self.tokenizer.unwrap_or_else(|| Arc::new(WordTokenizer)),
            self.sizes.unwrap_or_else(|| Arc::new(FsSizeOracle)),
            self.workers,
            self.policy,
        )
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Get the logical CPU count, with a safe fallback.
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
