use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Identifier of an indexed document.
///
/// Assigned by [`IndexStore::put_document`], dense and increasing from 0.
/// Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One document's occurrence count for one term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub document: DocumentId,
    pub frequency: u64,
}

/// Shared, thread-safe inverted index.
///
/// Holds the document table (id → path) and the term index
/// (term → postings). Both only ever grow.
///
/// # Locking
///
/// Three exclusive locks, each held for a whole map access:
///
/// - `next_id`: the document counter
/// - `documents`: the document table, always taken *while* holding `next_id`
///   so an id is never observable before its path is
/// - `terms`: the term index
///
/// Reads serialize with writes on the same table. There is no reader/writer
/// split; correctness only needs mutual exclusion.
#[derive(Debug, Default)]
pub struct IndexStore {
    next_id: Mutex<u64>,
    documents: Mutex<Vec<PathBuf>>,
    terms: Mutex<HashMap<String, Vec<Posting>>>,
}

impl IndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document and return its freshly assigned id.
    ///
    /// The path is stored verbatim. Registering the same path twice yields
    /// two distinct documents.
    pub fn put_document(&self, path: impl Into<PathBuf>) -> DocumentId {
        let path = path.into();
        let mut next_id = lock(&self.next_id);
        let id = *next_id;
        *next_id += 1;

        // Still under the counter lock: ids land in the table in order.
        let mut documents = lock(&self.documents);
        debug_assert_eq!(documents.len() as u64, id);
        documents.push(path);

        DocumentId(id)
    }

    /// Path of a registered document, `None` for an unknown id.
    pub fn get_document(&self, id: DocumentId) -> Option<PathBuf> {
        let documents = lock(&self.documents);
        usize::try_from(id.0)
            .ok()
            .and_then(|idx| documents.get(idx))
            .cloned()
    }

    /// Append one posting per `(term, count)` pair for `id`.
    ///
    /// Must be called at most once per document; a second call appends
    /// duplicate postings.
    pub fn update_index(&self, id: DocumentId, frequencies: HashMap<String, u64>) {
        let mut terms = lock(&self.terms);
        for (term, frequency) in frequencies {
            terms.entry(term).or_default().push(Posting {
                document: id,
                frequency,
            });
        }
    }

    /// Snapshot of the postings for `term`, in commit order. Empty if unseen.
    pub fn lookup_index(&self, term: &str) -> Vec<Posting> {
        lock(&self.terms).get(term).cloned().unwrap_or_default()
    }

    /// Number of documents registered so far.
    pub fn document_count(&self) -> usize {
        lock(&self.documents).len()
    }

    /// Number of distinct terms in the index.
    pub fn term_count(&self) -> usize {
        lock(&self.terms).len()
    }
}

/// Every critical section leaves its map consistent, so a panic elsewhere
/// while holding the lock does not invalidate the data.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn counts(pairs: &[(&str, u64)]) -> HashMap<String, u64> {
        pairs.iter().map(|(t, c)| (t.to_string(), *c)).collect()
    }

    #[test]
    fn ids_start_at_zero_and_increase() {
        let store = IndexStore::new();
        assert_eq!(store.put_document("a.txt"), DocumentId(0));
        assert_eq!(store.put_document("b.txt"), DocumentId(1));
        assert_eq!(store.put_document("a.txt"), DocumentId(2));
        assert_eq!(store.document_count(), 3);
    }

    #[test]
    fn unknown_document_is_a_miss() {
        let store = IndexStore::new();
        store.put_document("only.txt");
        assert_eq!(store.get_document(DocumentId(0)), Some(PathBuf::from("only.txt")));
        assert_eq!(store.get_document(DocumentId(1)), None);
        assert_eq!(store.get_document(DocumentId(u64::MAX)), None);
    }

    #[test]
    fn unseen_term_is_empty() {
        let store = IndexStore::new();
        assert!(store.lookup_index("nothing").is_empty());
    }

    #[test]
    fn postings_keep_commit_order() {
        let store = IndexStore::new();
        let a = store.put_document("a.txt");
        let b = store.put_document("b.txt");
        store.update_index(b, counts(&[("rust", 3)]));
        store.update_index(a, counts(&[("rust", 1), ("tokio", 2)]));

        assert_eq!(
            store.lookup_index("rust"),
            vec![
                Posting { document: b, frequency: 3 },
                Posting { document: a, frequency: 1 },
            ]
        );
        assert_eq!(store.lookup_index("tokio"), vec![Posting { document: a, frequency: 2 }]);
        assert_eq!(store.term_count(), 2);
    }

    #[test]
    fn concurrent_puts_are_unique_dense_and_resolvable() {
        let store = Arc::new(IndexStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    (0..250)
                        .map(|i| {
                            let path = PathBuf::from(format!("t{t}/f{i}"));
                            let id = store.put_document(path.clone());
                            assert_eq!(store.get_document(id), Some(path));
                            id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let ids: HashSet<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .map(|id| id.0)
            .collect();

        assert_eq!(ids.len(), 2000);
        assert_eq!(ids, (0..2000).collect());
    }

    #[test]
    fn concurrent_updates_do_not_lose_or_duplicate_postings() {
        let store = Arc::new(IndexStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..100u64 {
                        let own = format!("own{t}");
                        let id = store.put_document(format!("t{t}/f{i}"));
                        store.update_index(id, counts(&[("shared", i + 1), (own.as_str(), 1)]));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let shared = store.lookup_index("shared");
        assert_eq!(shared.len(), 800);
        let distinct: HashSet<DocumentId> = shared.iter().map(|p| p.document).collect();
        assert_eq!(distinct.len(), 800);
        for t in 0..8 {
            assert_eq!(store.lookup_index(&format!("own{t}")).len(), 100);
        }
    }
}
