//! Object pooling for [`DocumentMatch`] records.

use crate::search::document_match::DocumentMatch;
use crate::search::size;

/// A per-query arena of reusable [`DocumentMatch`] records.
///
/// The pool is pre-sized from the root searcher's
/// `document_match_pool_size()` before execution starts, so it does not grow
/// mid-query in the common case; when drained it falls back to allocating a
/// fresh record. Ownership transfers on [`get`](Self::get) and
/// [`put`](Self::put): a record handed to a caller is never also resident
/// in the free list. Debug builds assert that no record is put back without
/// a matching get.
///
/// A pool belongs to exactly one query's `SearchContext` and must not be
/// shared across concurrent queries.
#[derive(Debug)]
pub struct DocumentMatchPool {
    avail: Vec<DocumentMatch>,
    outstanding: usize,
}

impl DocumentMatchPool {
    /// Create a pool holding `size` pre-allocated, reset records.
    pub fn new(size: usize) -> Self {
        DocumentMatchPool {
            avail: (0..size).map(|_| DocumentMatch::new()).collect(),
            outstanding: 0,
        }
    }

    /// Borrow a record in a cleared state, allocating only when the free
    /// list is empty.
    pub fn get(&mut self) -> DocumentMatch {
        self.outstanding += 1;
        self.avail.pop().unwrap_or_default()
    }

    /// Return a record to the pool. The record is reset before it becomes
    /// available again; after `put` the caller no longer owns it.
    pub fn put(&mut self, mut document_match: DocumentMatch) {
        debug_assert!(
            self.outstanding > 0,
            "put of a DocumentMatch that was never issued by this pool"
        );
        self.outstanding = self.outstanding.saturating_sub(1);
        document_match.reset();
        self.avail.push(document_match);
    }

    /// Number of records currently available for borrowing.
    pub fn available(&self) -> usize {
        self.avail.len()
    }

    /// Number of records currently borrowed and not yet returned.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Structural estimate of the pool's heap footprint.
    pub fn size_in_bytes(&self) -> usize {
        let mut size_in_bytes = size::DOCUMENT_MATCH_POOL_OVERHEAD;
        for entry in &self.avail {
            size_in_bytes += entry.size_in_bytes();
        }
        size_in_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_get_put_cycle() {
        let mut pool = DocumentMatchPool::new(2);
        assert_eq!(pool.available(), 2);

        let mut a = pool.get();
        let b = pool.get();
        assert_eq!(pool.available(), 0);
        assert_eq!(pool.outstanding(), 2);

        a.score = 3.0;
        a.id = "dirty".to_string();
        pool.put(a);
        pool.put(b);
        assert_eq!(pool.available(), 2);
        assert_eq!(pool.outstanding(), 0);

        // Records come back cleared.
        let c = pool.get();
        assert_eq!(c.score, 0.0);
        assert!(c.id.is_empty());
    }

    #[test]
    fn test_pool_allocates_when_drained() {
        let mut pool = DocumentMatchPool::new(1);
        let a = pool.get();
        let b = pool.get();
        assert_eq!(pool.outstanding(), 2);
        pool.put(a);
        pool.put(b);
        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn test_pool_reuses_match_buffers() {
        let mut pool = DocumentMatchPool::new(1);

        let mut dm = pool.get();
        dm.internal_id.copy_from(b"a-long-enough-identifier");
        let capacity = dm.internal_id.capacity();
        pool.put(dm);

        let dm = pool.get();
        assert_eq!(dm.internal_id.len(), 0);
        assert_eq!(dm.internal_id.capacity(), capacity);
    }
}
