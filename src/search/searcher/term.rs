//! Leaf searcher over one postings cursor.

use std::mem;

use crate::error::{KensakuError, Result};
use crate::index::memory::VecPostingsCursor;
use crate::index::{IndexReader, PostingsCursor};
use crate::search::context::{SearchContext, SearcherOptions};
use crate::search::document_match::DocumentMatch;
use crate::search::scorer::TermScorer;
use crate::search::searcher::Searcher;
use crate::search::size;

/// A searcher that yields the documents containing one term in one field.
///
/// `next`/`advance` map 1:1 onto the underlying cursor's own next/skip
/// operations.
#[derive(Debug)]
pub struct TermSearcher {
    cursor: Box<dyn PostingsCursor>,
    scorer: TermScorer,
    count: u64,
}

impl TermSearcher {
    /// Create a term searcher from an index reader.
    ///
    /// A term absent from the field yields an immediately exhausted
    /// searcher rather than an error.
    pub fn new<F, T>(
        reader: &dyn IndexReader,
        field: F,
        term: T,
        boost: f64,
        options: SearcherOptions,
    ) -> Result<Self>
    where
        F: Into<String>,
        T: Into<String>,
    {
        let field = field.into();
        let term = term.into();
        let cursor = match reader.postings(&field, &term)? {
            Some(cursor) => cursor,
            None => Box::new(VecPostingsCursor::new(Vec::new())),
        };
        let count = cursor.count();
        let scorer = TermScorer::new(field, term, count, reader.doc_count(), boost, options);
        Ok(TermSearcher {
            cursor,
            scorer,
            count,
        })
    }

    /// Create a term searcher directly over a cursor, with precomputed
    /// statistics.
    pub fn from_cursor(cursor: Box<dyn PostingsCursor>, scorer: TermScorer) -> Self {
        let count = cursor.count();
        TermSearcher {
            cursor,
            scorer,
            count,
        }
    }

    fn score_current(&self, ctx: &mut SearchContext) -> Result<DocumentMatch> {
        match self.cursor.doc() {
            Some(posting) => Ok(self.scorer.score(ctx, posting)),
            None => Err(KensakuError::index(
                "postings cursor returned a position without a posting",
            )),
        }
    }
}

impl Searcher for TermSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        if self.cursor.next()? {
            Ok(Some(self.score_current(ctx)?))
        } else {
            Ok(None)
        }
    }

    fn advance(&mut self, ctx: &mut SearchContext, target: &[u8]) -> Result<Option<DocumentMatch>> {
        // A target at or behind the current position re-returns the current
        // match as a fresh record.
        if let Some(posting) = self.cursor.doc() {
            if posting.doc.as_bytes() >= target {
                return Ok(Some(self.score_current(ctx)?));
            }
        }
        if self.cursor.skip_to(target)? {
            Ok(Some(self.score_current(ctx)?))
        } else {
            Ok(None)
        }
    }

    fn close(&mut self) -> Result<()> {
        self.cursor.close()
    }

    fn weight(&self) -> f64 {
        self.scorer.weight()
    }

    fn set_query_norm(&mut self, query_norm: f64) {
        self.scorer.set_query_norm(query_norm);
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn size_in_bytes(&self) -> usize {
        mem::size_of::<Self>() + size::SIZE_OF_PTR
    }

    fn document_match_pool_size(&self) -> usize {
        1
    }
}
