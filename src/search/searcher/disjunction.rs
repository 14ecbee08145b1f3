//! Union of child searchers by k-way min-merge, with a min-match threshold.

use std::mem;

use crate::error::Result;
use crate::search::context::{SearchContext, SearcherOptions};
use crate::search::document_match::DocumentMatch;
use crate::search::scorer::DisjunctionScorer;
use crate::search::searcher::{close_children, ChildSlot, Searcher};

/// A searcher matching the documents matched by at least `min_matches` of
/// its children.
///
/// The candidate at each step is the minimum id among live children; it is
/// emitted when enough children sit on it, otherwise those children are
/// stepped past it and the scan continues. With `min_matches` of 0 or 1
/// this is a plain union. Iteration stops early once fewer live children
/// remain than the threshold requires.
#[derive(Debug)]
pub struct DisjunctionSearcher {
    searchers: Vec<Box<dyn Searcher>>,
    slots: Vec<ChildSlot>,
    scorer: DisjunctionScorer,
    min_matches: usize,
    // holds the candidate id while children borrow &mut self.searchers
    scratch: Vec<u8>,
    done: bool,
}

impl DisjunctionSearcher {
    /// Create a disjunction over the given children. An empty child list
    /// yields an immediately exhausted searcher.
    pub fn new(
        searchers: Vec<Box<dyn Searcher>>,
        min_matches: usize,
        options: SearcherOptions,
    ) -> Self {
        let slots = searchers.iter().map(|_| ChildSlot::Pending).collect();
        DisjunctionSearcher {
            searchers,
            slots,
            scorer: DisjunctionScorer::new(options),
            min_matches,
            scratch: Vec::new(),
            done: false,
        }
    }

    fn effective_min(&self) -> usize {
        self.min_matches.max(1)
    }

    /// Scan forward from the current candidates to the next document with
    /// enough matching children, or exhaust. Every non-exhausted slot holds
    /// a candidate on entry.
    fn find_match(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        loop {
            let live = self
                .slots
                .iter()
                .filter(|slot| !slot.is_exhausted())
                .count();
            if live < self.effective_min() {
                for slot in &mut self.slots {
                    slot.release(ctx);
                }
                self.done = true;
                return Ok(None);
            }

            let mut min: Option<&[u8]> = None;
            for slot in &self.slots {
                if let Some(id) = slot.id() {
                    if min.is_none() || id < min.unwrap_or(&[]) {
                        min = Some(id);
                    }
                }
            }
            let min = match min {
                Some(id) => id,
                None => {
                    // Live slots exist but none hold a candidate; cannot
                    // happen when callers refill before calling.
                    self.done = true;
                    return Ok(None);
                }
            };
            self.scratch.clear();
            self.scratch.extend_from_slice(min);

            let matching = self
                .slots
                .iter()
                .filter(|slot| slot.id() == Some(self.scratch.as_slice()))
                .count();
            if matching >= self.effective_min() {
                let mut constituents = Vec::with_capacity(matching);
                for slot in &mut self.slots {
                    if slot.id() == Some(self.scratch.as_slice()) {
                        if let Some(dm) = slot.take() {
                            constituents.push(dm);
                        }
                    }
                }
                let total = self.searchers.len();
                return Ok(Some(self.scorer.score(ctx, constituents, total)));
            }

            // Not enough children on the candidate; step them past it.
            for (slot, child) in self.slots.iter_mut().zip(self.searchers.iter_mut()) {
                if slot.id() == Some(self.scratch.as_slice()) {
                    slot.release(ctx);
                    slot.fill(child.next(ctx)?);
                }
            }
        }
    }
}

impl Searcher for DisjunctionSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        if self.done {
            return Ok(None);
        }
        for (slot, child) in self.slots.iter_mut().zip(self.searchers.iter_mut()) {
            if slot.is_pending() {
                slot.fill(child.next(ctx)?);
            }
        }
        self.find_match(ctx)
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
        self.find_match(ctx)
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
        self.searchers.iter().map(|s| s.count()).sum()
    }

    fn min(&self) -> usize {
        self.min_matches
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::memory::MemoryIndexReader;
    use crate::search::searcher::TermSearcher;

    fn reader_with_terms(terms: &[(&str, &[&[u8]])]) -> MemoryIndexReader {
        let mut reader = MemoryIndexReader::new();
        let mut seen: Vec<Vec<u8>> = Vec::new();
        for (term, ids) in terms {
            for id in *ids {
                if !seen.iter().any(|s| s == id) {
                    reader.add_document(&String::from_utf8_lossy(id), id);
                    seen.push(id.to_vec());
                }
                reader.add_term(id, "body", term, &[(1, 0, 4)]);
            }
        }
        reader
    }

    fn term_searcher(reader: &MemoryIndexReader, term: &str) -> Box<dyn Searcher> {
        Box::new(
            TermSearcher::new(reader, "body", term, 1.0, SearcherOptions::default()).unwrap(),
        )
    }

    fn drain_ids(searcher: &mut dyn Searcher, ctx: &mut SearchContext) -> Vec<Vec<u8>> {
        let mut ids = Vec::new();
        while let Some(dm) = searcher.next(ctx).unwrap() {
            ids.push(dm.internal_id.as_bytes().to_vec());
            ctx.pool.put(dm);
        }
        ids
    }

    #[test]
    fn test_disjunction_unions_children_in_order() {
        let reader = reader_with_terms(&[
            ("a", &[b"1", b"4"]),
            ("b", &[b"2", b"4"]),
            ("c", &[b"3"]),
        ]);
        let children = vec![
            term_searcher(&reader, "a"),
            term_searcher(&reader, "b"),
            term_searcher(&reader, "c"),
        ];
        let mut searcher = DisjunctionSearcher::new(children, 0, SearcherOptions::default());
        let mut ctx = SearchContext::for_searcher(&searcher);

        assert_eq!(
            drain_ids(&mut searcher, &mut ctx),
            vec![b"1".to_vec(), b"2".to_vec(), b"3".to_vec(), b"4".to_vec()]
        );
        searcher.close().unwrap();
    }

    #[test]
    fn test_disjunction_min_two_of_three() {
        let reader = reader_with_terms(&[
            ("a", &[b"1", b"2", b"3"]),
            ("b", &[b"2", b"3", b"4"]),
            ("c", &[b"3", b"4", b"5"]),
        ]);
        let children = vec![
            term_searcher(&reader, "a"),
            term_searcher(&reader, "b"),
            term_searcher(&reader, "c"),
        ];
        let mut searcher = DisjunctionSearcher::new(children, 2, SearcherOptions::default());
        assert_eq!(searcher.min(), 2);
        let mut ctx = SearchContext::for_searcher(&searcher);

        assert_eq!(
            drain_ids(&mut searcher, &mut ctx),
            vec![b"2".to_vec(), b"3".to_vec(), b"4".to_vec()]
        );
    }

    #[test]
    fn test_disjunction_stops_when_too_few_children_remain() {
        // After "a" exhausts, only one live child remains but two matches
        // are required; iteration must stop without visiting "9".
        let reader = reader_with_terms(&[("a", &[b"1"]), ("b", &[b"1", b"9"])]);
        let children = vec![term_searcher(&reader, "a"), term_searcher(&reader, "b")];
        let mut searcher = DisjunctionSearcher::new(children, 2, SearcherOptions::default());
        let mut ctx = SearchContext::for_searcher(&searcher);

        assert_eq!(drain_ids(&mut searcher, &mut ctx), vec![b"1".to_vec()]);
    }

    #[test]
    fn test_disjunction_empty_children_is_exhausted() {
        let mut searcher = DisjunctionSearcher::new(Vec::new(), 0, SearcherOptions::default());
        let mut ctx = SearchContext::new(1);
        assert!(searcher.next(&mut ctx).unwrap().is_none());
        assert_eq!(searcher.count(), 0);
    }

    #[test]
    fn test_disjunction_advance_is_idempotent() {
        let reader = reader_with_terms(&[("a", &[b"1", b"5"]), ("b", &[b"3", b"5"])]);
        let children = vec![term_searcher(&reader, "a"), term_searcher(&reader, "b")];
        let mut searcher = DisjunctionSearcher::new(children, 0, SearcherOptions::default());
        let mut ctx = SearchContext::for_searcher(&searcher);

        let first = searcher.advance(&mut ctx, b"2").unwrap().unwrap();
        assert_eq!(first.internal_id.as_bytes(), b"3");
        let again = searcher.advance(&mut ctx, b"2").unwrap().unwrap();
        assert_eq!(again.internal_id.as_bytes(), b"3");
        ctx.pool.put(first);
        ctx.pool.put(again);

        let next = searcher.next(&mut ctx).unwrap().unwrap();
        assert_eq!(next.internal_id.as_bytes(), b"5");
        ctx.pool.put(next);
        assert!(searcher.next(&mut ctx).unwrap().is_none());
    }
}
