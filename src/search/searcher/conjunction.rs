//! Intersection of child searchers by k-way max-merge alignment.

use std::mem;

use crate::error::{KensakuError, Result};
use crate::search::context::{SearchContext, SearcherOptions};
use crate::search::document_match::DocumentMatch;
use crate::search::scorer::ConjunctionScorer;
use crate::search::searcher::{close_children, ChildSlot, Searcher};

/// A searcher matching the documents matched by every child.
///
/// Children are merge-aligned on the maximum candidate id: any child behind
/// the maximum is advanced to it, and a document is emitted only when all
/// children sit on the same id. Child candidates are pulled lazily, at the
/// start of the following `next`/`advance` call, so a repeated `advance`
/// with the same target re-observes the same alignment.
#[derive(Debug)]
pub struct ConjunctionSearcher {
    searchers: Vec<Box<dyn Searcher>>,
    slots: Vec<ChildSlot>,
    scorer: ConjunctionScorer,
    // holds the alignment target while children borrow &mut self.searchers
    scratch: Vec<u8>,
    done: bool,
}

impl ConjunctionSearcher {
    /// Create a conjunction over the given children. An empty child list is
    /// rejected: the intersection of nothing is not a meaningful query.
    pub fn new(searchers: Vec<Box<dyn Searcher>>, options: SearcherOptions) -> Result<Self> {
        if searchers.is_empty() {
            return Err(KensakuError::query(
                "conjunction searcher requires at least one child",
            ));
        }
        // Cheapest child first so alignment targets come from the rarest
        // terms early.
        let mut searchers = searchers;
        searchers.sort_by_key(|s| s.count());
        let slots = searchers.iter().map(|_| ChildSlot::Pending).collect();
        Ok(ConjunctionSearcher {
            searchers,
            slots,
            scorer: ConjunctionScorer::new(options),
            scratch: Vec::new(),
            done: false,
        })
    }

    /// Drive all children to the same document id, or exhaust.
    fn align(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        loop {
            if self.slots.iter().any(ChildSlot::is_exhausted) {
                for slot in &mut self.slots {
                    slot.release(ctx);
                }
                self.done = true;
                return Ok(None);
            }

            // Every slot holds a candidate here; target is the maximum id.
            let mut max: &[u8] = &[];
            for slot in &self.slots {
                if let Some(id) = slot.id() {
                    if id > max {
                        max = id;
                    }
                }
            }
            self.scratch.clear();
            self.scratch.extend_from_slice(max);

            let mut aligned = true;
            for (slot, child) in self.slots.iter_mut().zip(self.searchers.iter_mut()) {
                let behind = match slot.id() {
                    Some(id) => id < self.scratch.as_slice(),
                    None => false,
                };
                if behind {
                    slot.release(ctx);
                    let pulled = child.advance(ctx, &self.scratch)?;
                    slot.fill(pulled);
                    aligned = false;
                }
            }
            if !aligned {
                continue;
            }

            let mut constituents = Vec::with_capacity(self.slots.len());
            for slot in &mut self.slots {
                if let Some(dm) = slot.take() {
                    constituents.push(dm);
                }
            }
            return Ok(Some(self.scorer.score(ctx, constituents)));
        }
    }
}

impl Searcher for ConjunctionSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        if self.done {
            return Ok(None);
        }
        for (slot, child) in self.slots.iter_mut().zip(self.searchers.iter_mut()) {
            if slot.is_pending() {
                slot.fill(child.next(ctx)?);
            }
        }
        self.align(ctx)
    }

    fn advance(&mut self, ctx: &mut SearchContext, target: &[u8]) -> Result<Option<DocumentMatch>> {
        if self.done {
            return Ok(None);
        }
        for (slot, child) in self.slots.iter_mut().zip(self.searchers.iter_mut()) {
            let behind = match slot.id() {
                Some(id) => id < target,
                None => slot.is_pending(),
            };
            if behind {
                slot.release(ctx);
                let pulled = child.advance(ctx, target)?;
                slot.fill(pulled);
            }
        }
        self.align(ctx)
    }

    fn close(&mut self) -> Result<()> {
        self.done = true;
        close_children(&mut self.searchers)
    }

    fn weight(&self) -> f64 {
        self.searchers.iter().map(|s| s.weight()).sum()
    }

    fn set_query_norm(&mut self, query_norm: f64) {
        for searcher in &mut self.searchers {
            searcher.set_query_norm(query_norm);
        }
    }

    fn count(&self) -> u64 {
        self.searchers
            .iter()
            .map(|s| s.count())
            .min()
            .unwrap_or(0)
    }

    fn size_in_bytes(&self) -> usize {
        mem::size_of::<Self>()
            + self.scratch.capacity()
            + self
                .searchers
                .iter()
                .map(|s| s.size_in_bytes())
                .sum::<usize>()
    }

    fn document_match_pool_size(&self) -> usize {
        1 + self
            .searchers
            .iter()
            .map(|s| s.document_match_pool_size())
            .sum::<usize>()
    }
}
