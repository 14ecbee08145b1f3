//! In-memory index reader.
//!
//! Backs the searcher and collector tests, and serves as the reference
//! implementation of the [`IndexReader`] and [`PostingsCursor`] contracts.

use std::collections::BTreeMap;

use ahash::AHashMap;

use crate::document::StoredDocument;
use crate::error::Result;
use crate::index::{IndexReader, InternalId, PostingsCursor, TermPosition, TermPosting};

/// A postings cursor over a sorted, fully materialized posting list.
#[derive(Debug)]
pub struct VecPostingsCursor {
    postings: Vec<TermPosting>,
    // 0 = before first, 1..=len = on postings[cursor - 1], len + 1 = exhausted.
    cursor: usize,
}

impl VecPostingsCursor {
    /// Create a cursor over postings already sorted by increasing doc id.
    pub fn new(postings: Vec<TermPosting>) -> Self {
        debug_assert!(postings.windows(2).all(|w| w[0].doc < w[1].doc));
        VecPostingsCursor {
            postings,
            cursor: 0,
        }
    }
}

impl PostingsCursor for VecPostingsCursor {
    fn doc(&self) -> Option<&TermPosting> {
        if self.cursor >= 1 && self.cursor <= self.postings.len() {
            Some(&self.postings[self.cursor - 1])
        } else {
            None
        }
    }

    fn next(&mut self) -> Result<bool> {
        if self.cursor <= self.postings.len() {
            self.cursor += 1;
        }
        Ok(self.cursor <= self.postings.len())
    }

    fn skip_to(&mut self, target: &[u8]) -> Result<bool> {
        if let Some(posting) = self.doc() {
            if posting.doc.as_bytes() >= target {
                return Ok(true);
            }
        }
        if self.cursor > self.postings.len() {
            return Ok(false);
        }
        let offset = self.postings[self.cursor..]
            .partition_point(|p| p.doc.as_bytes() < target);
        let index = self.cursor + offset;
        if index < self.postings.len() {
            self.cursor = index + 1;
            Ok(true)
        } else {
            self.cursor = self.postings.len() + 1;
            Ok(false)
        }
    }

    fn count(&self) -> u64 {
        self.postings.len() as u64
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
struct DocEntry {
    external_id: String,
    stored: Option<StoredDocument>,
}

/// A fully in-memory index snapshot.
///
/// Documents are registered with [`MemoryIndexReader::add_document`] and
/// term occurrences with [`MemoryIndexReader::add_term`]; the reader side
/// is the [`IndexReader`] impl.
#[derive(Debug, Default)]
pub struct MemoryIndexReader {
    // field -> term -> postings sorted by doc id
    postings: AHashMap<String, AHashMap<String, Vec<TermPosting>>>,
    docs: BTreeMap<Vec<u8>, DocEntry>,
}

impl MemoryIndexReader {
    /// Create an empty index.
    pub fn new() -> Self {
        MemoryIndexReader::default()
    }

    /// Register a document under its external and internal ids.
    pub fn add_document(&mut self, external_id: &str, internal_id: &[u8]) {
        self.docs.insert(
            internal_id.to_vec(),
            DocEntry {
                external_id: external_id.to_string(),
                stored: None,
            },
        );
    }

    /// Attach a stored body to a registered document.
    pub fn store_document(&mut self, internal_id: &[u8], document: StoredDocument) {
        if let Some(entry) = self.docs.get_mut(internal_id) {
            entry.stored = Some(document);
        }
    }

    /// Record occurrences of a term in a field of a document. Positions are
    /// `(pos, start, end)` triples; an empty slice records a frequency-1
    /// occurrence without position data.
    pub fn add_term(&mut self, internal_id: &[u8], field: &str, term: &str, positions: &[(u64, u64, u64)]) {
        let doc = InternalId::from_bytes(internal_id);
        let posting = if positions.is_empty() {
            TermPosting::new(doc)
        } else {
            TermPosting::with_positions(
                doc,
                positions
                    .iter()
                    .map(|&(pos, start, end)| TermPosition::new(pos, start, end))
                    .collect(),
            )
        };

        let list = self
            .postings
            .entry(field.to_string())
            .or_default()
            .entry(term.to_string())
            .or_default();
        let at = list.partition_point(|p| p.doc < posting.doc);
        if let Some(existing) = list.get_mut(at) {
            if existing.doc == posting.doc {
                existing.frequency += posting.frequency;
                existing.positions.extend(posting.positions);
                return;
            }
        }
        list.insert(at, posting);
    }
}

impl IndexReader for MemoryIndexReader {
    fn postings(&self, field: &str, term: &str) -> Result<Option<Box<dyn PostingsCursor>>> {
        let list = self.postings.get(field).and_then(|terms| terms.get(term));
        Ok(list.map(|postings| {
            Box::new(VecPostingsCursor::new(postings.clone())) as Box<dyn PostingsCursor>
        }))
    }

    fn field_terms(&self, field: &str) -> Result<Vec<String>> {
        let mut terms: Vec<String> = self
            .postings
            .get(field)
            .map(|terms| terms.keys().cloned().collect())
            .unwrap_or_default();
        terms.sort();
        Ok(terms)
    }

    fn all_doc_ids(&self) -> Result<Box<dyn PostingsCursor>> {
        let postings = self
            .docs
            .keys()
            .map(|id| TermPosting::new(InternalId::from_bytes(id)))
            .collect();
        Ok(Box::new(VecPostingsCursor::new(postings)))
    }

    fn doc_count(&self) -> u64 {
        self.docs.len() as u64
    }

    fn external_id(&self, id: &[u8]) -> Result<Option<String>> {
        Ok(self.docs.get(id).map(|entry| entry.external_id.clone()))
    }

    fn document(&self, id: &[u8]) -> Result<Option<StoredDocument>> {
        Ok(self.docs.get(id).and_then(|entry| entry.stored.clone()))
    }
}
