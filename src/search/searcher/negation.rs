//! Universe-minus-child searcher.

use std::mem;

use crate::error::Result;
use crate::search::context::SearchContext;
use crate::search::document_match::DocumentMatch;
use crate::search::searcher::{ChildSlot, Searcher};

/// A searcher matching the documents of `universe` that the `negated`
/// child does not match.
///
/// Universe matches pass through unmodified, scores included; the negated
/// child contributes nothing to scoring. The negated cursor is advanced
/// only as far as each candidate requires, a merge-skip rather than a
/// materialized exclusion set.
#[derive(Debug)]
pub struct NegationSearcher {
    universe: Box<dyn Searcher>,
    negated: Box<dyn Searcher>,
    negated_slot: ChildSlot,
    done: bool,
}

impl NegationSearcher {
    /// Create a negation of `negated` within `universe`.
    pub fn new(universe: Box<dyn Searcher>, negated: Box<dyn Searcher>) -> Self {
        NegationSearcher {
            universe,
            negated,
            negated_slot: ChildSlot::Pending,
            done: false,
        }
    }

    /// Check whether the negated child matches the candidate id, advancing
    /// it no further than the candidate.
    fn excluded(&mut self, ctx: &mut SearchContext, id: &[u8]) -> Result<bool> {
        let behind = match &self.negated_slot {
            ChildSlot::Pending => true,
            ChildSlot::Curr(dm) => dm.internal_id.as_bytes() < id,
            ChildSlot::Exhausted => false,
        };
        if behind {
            self.negated_slot.release(ctx);
            let pulled = self.negated.advance(ctx, id)?;
            self.negated_slot.fill(pulled);
        }
        Ok(self.negated_slot.id() == Some(id))
    }

    /// Pass through the candidate unless excluded, otherwise keep pulling
    /// from the universe.
    fn filter(
        &mut self,
        ctx: &mut SearchContext,
        mut candidate: Option<DocumentMatch>,
    ) -> Result<Option<DocumentMatch>> {
        loop {
            let dm = match candidate.take() {
                Some(dm) => dm,
                None => {
                    self.negated_slot.release(ctx);
                    self.done = true;
                    return Ok(None);
                }
            };
            if self.excluded(ctx, dm.internal_id.as_bytes())? {
                ctx.pool.put(dm);
                candidate = self.universe.next(ctx)?;
            } else {
                return Ok(Some(dm));
            }
        }
    }
}

impl Searcher for NegationSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        if self.done {
            return Ok(None);
        }
        let candidate = self.universe.next(ctx)?;
        self.filter(ctx, candidate)
    }

    fn advance(&mut self, ctx: &mut SearchContext, target: &[u8]) -> Result<Option<DocumentMatch>> {
        if self.done {
            return Ok(None);
        }
        let candidate = self.universe.advance(ctx, target)?;
        self.filter(ctx, candidate)
    }

    fn close(&mut self) -> Result<()> {
        self.done = true;
        let mut errors = Vec::new();
        if let Err(err) = self.universe.close() {
            errors.push(err);
        }
        if let Err(err) = self.negated.close() {
            errors.push(err);
        }
        crate::error::KensakuError::close_aggregate(errors)
    }

    fn weight(&self) -> f64 {
        self.universe.weight()
    }

    fn set_query_norm(&mut self, query_norm: f64) {
        // The negated child never contributes a score.
        self.universe.set_query_norm(query_norm);
    }

    fn count(&self) -> u64 {
        self.universe.count().saturating_sub(self.negated.count())
    }

    fn size_in_bytes(&self) -> usize {
        mem::size_of::<Self>()
            + self.universe.size_in_bytes()
            + self.negated.size_in_bytes()
    }

    fn document_match_pool_size(&self) -> usize {
        1 + self.universe.document_match_pool_size() + self.negated.document_match_pool_size()
    }
}
