//! Boundary types consumed from an index reader.
//!
//! The query-execution core never touches the on-disk index format. It sees
//! the index through two trait objects: [`PostingsCursor`], a per-term stream
//! of postings in increasing [`InternalId`] order with skip-ahead, and
//! [`IndexReader`], which hands out cursors and loads stored document bodies.

pub mod memory;

use std::fmt;

use crate::document::StoredDocument;
use crate::error::Result;

/// An opaque, totally-ordered byte-sequence key identifying a document
/// within one index snapshot.
///
/// The byte order of the key is the canonical iteration order for every
/// searcher. The backing buffer is reusable: [`InternalId::clear`] truncates
/// to zero length without giving capacity back to the allocator, and
/// [`InternalId::copy_from`] refills it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InternalId(Vec<u8>);

impl InternalId {
    /// Create a new empty id.
    pub fn new() -> Self {
        InternalId(Vec::new())
    }

    /// Create an id from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        InternalId(bytes.to_vec())
    }

    /// Get the raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Check whether the id is empty (unset).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the key length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get the capacity of the backing buffer.
    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }

    /// Truncate to zero length, keeping the backing buffer allocated.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Replace the key bytes, reusing the backing buffer.
    pub fn copy_from(&mut self, bytes: &[u8]) {
        self.0.clear();
        self.0.extend_from_slice(bytes);
    }
}

impl AsRef<[u8]> for InternalId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for InternalId {
    fn from(bytes: &[u8]) -> Self {
        InternalId::from_bytes(bytes)
    }
}

impl From<Vec<u8>> for InternalId {
    fn from(bytes: Vec<u8>) -> Self {
        InternalId(bytes)
    }
}

impl fmt::Display for InternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// One occurrence of a term within a field of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermPosition {
    /// Position of the term within the field, starting at 1.
    pub pos: u64,
    /// Byte offset where the occurrence starts.
    pub start: u64,
    /// Byte offset where the occurrence ends.
    pub end: u64,
    /// Which element(s) of an array-valued field the occurrence belongs to.
    pub array_positions: Vec<u64>,
}

impl TermPosition {
    /// Create a new term position without array positions.
    pub fn new(pos: u64, start: u64, end: u64) -> Self {
        TermPosition {
            pos,
            start,
            end,
            array_positions: Vec::new(),
        }
    }

    /// Create a new term position inside an array-valued field element.
    pub fn with_array_positions(pos: u64, start: u64, end: u64, array_positions: Vec<u64>) -> Self {
        TermPosition {
            pos,
            start,
            end,
            array_positions,
        }
    }
}

/// A single posting in a posting list.
#[derive(Debug, Clone, PartialEq)]
pub struct TermPosting {
    /// Internal id of the document containing the term.
    pub doc: InternalId,
    /// Term frequency in the document.
    pub frequency: u32,
    /// Positions of the term in the document (for phrase verification and
    /// term-vector population).
    pub positions: Vec<TermPosition>,
}

impl TermPosting {
    /// Create a new posting with frequency 1 and no positions.
    pub fn new(doc: InternalId) -> Self {
        TermPosting {
            doc,
            frequency: 1,
            positions: Vec::new(),
        }
    }

    /// Create a posting with an explicit frequency.
    pub fn with_frequency(doc: InternalId, frequency: u32) -> Self {
        TermPosting {
            doc,
            frequency,
            positions: Vec::new(),
        }
    }

    /// Create a posting with positions; frequency is the position count.
    pub fn with_positions(doc: InternalId, positions: Vec<TermPosition>) -> Self {
        let frequency = positions.len() as u32;
        TermPosting {
            doc,
            frequency,
            positions,
        }
    }
}

/// A per-term ordered stream of postings from the index.
///
/// Cursors start positioned before the first posting; `next` must be called
/// once before `doc` returns anything. Postings are yielded in strictly
/// increasing [`InternalId`] order.
pub trait PostingsCursor: Send + fmt::Debug {
    /// Get the current posting, or `None` before the first `next` call and
    /// after exhaustion.
    fn doc(&self) -> Option<&TermPosting>;

    /// Move to the next posting. Returns `false` on exhaustion.
    fn next(&mut self) -> Result<bool>;

    /// Skip to the first posting with id >= target. A target at or behind
    /// the current position holds position. Returns `false` on exhaustion.
    fn skip_to(&mut self, target: &[u8]) -> Result<bool>;

    /// Upper-bound estimate of how many postings this cursor yields.
    fn count(&self) -> u64;

    /// Release any resources held by this cursor.
    fn close(&mut self) -> Result<()>;
}

/// Read-only view of one index snapshot.
pub trait IndexReader: Send + Sync + fmt::Debug {
    /// Get a postings cursor for a term in a field, or `None` when the term
    /// does not occur in the field.
    fn postings(&self, field: &str, term: &str) -> Result<Option<Box<dyn PostingsCursor>>>;

    /// Enumerate the terms indexed under a field, for term-expansion
    /// searchers (fuzzy, numeric range).
    fn field_terms(&self, field: &str) -> Result<Vec<String>>;

    /// Get a cursor over every live document id, in increasing order.
    fn all_doc_ids(&self) -> Result<Box<dyn PostingsCursor>>;

    /// Total number of documents in the snapshot.
    fn doc_count(&self) -> u64;

    /// Resolve an internal id to its human-visible external id.
    fn external_id(&self, id: &[u8]) -> Result<Option<String>>;

    /// Load the stored body for a document, for lazy attachment to a match.
    fn document(&self, id: &[u8]) -> Result<Option<StoredDocument>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_id_ordering() {
        let a = InternalId::from_bytes(b"a");
        let b = InternalId::from_bytes(b"b");
        let aa = InternalId::from_bytes(b"aa");

        assert!(a < b);
        assert!(a < aa);
        assert!(aa < b);
    }

    #[test]
    fn test_internal_id_buffer_reuse() {
        let mut id = InternalId::from_bytes(b"document-42");
        let cap = id.capacity();

        id.clear();
        assert!(id.is_empty());
        assert_eq!(id.capacity(), cap);

        id.copy_from(b"doc-7");
        assert_eq!(id.as_bytes(), b"doc-7");
        assert_eq!(id.capacity(), cap);
    }

    #[test]
    fn test_term_posting_with_positions() {
        let posting = TermPosting::with_positions(
            InternalId::from_bytes(b"1"),
            vec![TermPosition::new(1, 0, 5), TermPosition::new(4, 20, 25)],
        );
        assert_eq!(posting.frequency, 2);
        assert_eq!(posting.positions.len(), 2);
    }
}
