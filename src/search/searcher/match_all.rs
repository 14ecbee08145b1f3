//! Searchers over the whole document universe, and over nothing.

use std::mem;

use crate::error::{KensakuError, Result};
use crate::index::{IndexReader, PostingsCursor};
use crate::search::context::{SearchContext, SearcherOptions};
use crate::search::document_match::DocumentMatch;
use crate::search::scorer::ConstantScorer;
use crate::search::searcher::Searcher;
use crate::search::size;

/// A searcher that matches every live document with a constant score.
///
/// Serves as the universe operand of a [`NegationSearcher`] and as the
/// evaluation of an explicit match-all query.
///
/// [`NegationSearcher`]: crate::search::searcher::NegationSearcher
#[derive(Debug)]
pub struct MatchAllSearcher {
    cursor: Box<dyn PostingsCursor>,
    scorer: ConstantScorer,
    count: u64,
}

impl MatchAllSearcher {
    /// Create a match-all searcher over the reader's live documents.
    pub fn new(reader: &dyn IndexReader, boost: f64, options: SearcherOptions) -> Result<Self> {
        let cursor = reader.all_doc_ids()?;
        Ok(MatchAllSearcher {
            cursor,
            scorer: ConstantScorer::new(boost, options),
            count: reader.doc_count(),
        })
    }

    fn score_current(&self, ctx: &mut SearchContext) -> Result<DocumentMatch> {
        match self.cursor.doc() {
            Some(posting) => Ok(self.scorer.score(ctx, posting.doc.as_bytes())),
            None => Err(KensakuError::index(
                "doc-id cursor returned a position without a posting",
            )),
        }
    }
}

impl Searcher for MatchAllSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        if self.cursor.next()? {
            Ok(Some(self.score_current(ctx)?))
        } else {
            Ok(None)
        }
    }

    fn advance(&mut self, ctx: &mut SearchContext, target: &[u8]) -> Result<Option<DocumentMatch>> {
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

/// A searcher that never matches.
#[derive(Debug, Default)]
pub struct MatchNoneSearcher;

impl MatchNoneSearcher {
    /// Create a match-none searcher.
    pub fn new() -> Self {
        MatchNoneSearcher
    }
}

impl Searcher for MatchNoneSearcher {
    fn next(&mut self, _ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        Ok(None)
    }

    fn advance(&mut self, _ctx: &mut SearchContext, _target: &[u8]) -> Result<Option<DocumentMatch>> {
        Ok(None)
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn weight(&self) -> f64 {
        0.0
    }

    fn set_query_norm(&mut self, _query_norm: f64) {}

    fn count(&self) -> u64 {
        0
    }

    fn size_in_bytes(&self) -> usize {
        mem::size_of::<Self>()
    }

    fn document_match_pool_size(&self) -> usize {
        0
    }
}
