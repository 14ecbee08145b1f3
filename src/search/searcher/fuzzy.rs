//! Fuzzy term matching by dictionary expansion.

use std::mem;

use crate::error::Result;
use crate::index::IndexReader;
use crate::search::context::{SearchContext, SearcherOptions};
use crate::search::document_match::DocumentMatch;
use crate::search::searcher::{DisjunctionSearcher, Searcher, TermSearcher};
use crate::util::levenshtein::levenshtein_distance_within;

/// A searcher matching documents containing any term within a bounded edit
/// distance of the query term.
///
/// The field's term dictionary is expanded up front into the set of terms
/// within `fuzziness` edits, and evaluation delegates to a disjunction of
/// plain term searchers over that set.
#[derive(Debug)]
pub struct FuzzySearcher {
    inner: DisjunctionSearcher,
    expanded_terms: usize,
}

impl FuzzySearcher {
    /// Create a fuzzy searcher for `term` in `field` with the given edit
    /// distance bound. Fuzziness 0 degenerates to exact term matching.
    pub fn new(
        reader: &dyn IndexReader,
        field: &str,
        term: &str,
        fuzziness: usize,
        boost: f64,
        options: SearcherOptions,
    ) -> Result<Self> {
        let mut children: Vec<Box<dyn Searcher>> = Vec::new();
        for candidate in reader.field_terms(field)? {
            if levenshtein_distance_within(term, &candidate, fuzziness).is_some() {
                children.push(Box::new(TermSearcher::new(
                    reader, field, candidate, boost, options,
                )?));
            }
        }
        let expanded_terms = children.len();
        Ok(FuzzySearcher {
            inner: DisjunctionSearcher::new(children, 1, options),
            expanded_terms,
        })
    }

    /// Number of dictionary terms the query expanded to.
    pub fn expanded_terms(&self) -> usize {
        self.expanded_terms
    }
}

impl Searcher for FuzzySearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        self.inner.next(ctx)
    }

    fn advance(&mut self, ctx: &mut SearchContext, target: &[u8]) -> Result<Option<DocumentMatch>> {
        self.inner.advance(ctx, target)
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }

    fn weight(&self) -> f64 {
        self.inner.weight()
    }

    fn set_query_norm(&mut self, query_norm: f64) {
        self.inner.set_query_norm(query_norm);
    }

    fn count(&self) -> u64 {
        self.inner.count()
    }

    fn size_in_bytes(&self) -> usize {
        mem::size_of::<Self>() + self.inner.size_in_bytes()
    }

    fn document_match_pool_size(&self) -> usize {
        self.inner.document_match_pool_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::memory::MemoryIndexReader;

    fn reader() -> MemoryIndexReader {
        let mut reader = MemoryIndexReader::new();
        for (n, id) in [b"1", b"2", b"3", b"4"].iter().enumerate() {
            reader.add_document(&format!("doc{n}"), *id);
        }
        reader.add_term(b"1", "body", "tree", &[(1, 0, 4)]);
        reader.add_term(b"2", "body", "free", &[(1, 0, 4)]);
        reader.add_term(b"3", "body", "three", &[(1, 0, 5)]);
        reader.add_term(b"4", "body", "grove", &[(1, 0, 5)]);
        reader
    }

    #[test]
    fn test_fuzzy_expands_within_distance() {
        let reader = reader();
        let mut searcher =
            FuzzySearcher::new(&reader, "body", "tree", 1, 1.0, SearcherOptions::default())
                .unwrap();
        // tree (0), free (1), three (1); grove is too far.
        assert_eq!(searcher.expanded_terms(), 3);

        let mut ctx = SearchContext::for_searcher(&searcher);
        let mut ids = Vec::new();
        while let Some(dm) = searcher.next(&mut ctx).unwrap() {
            ids.push(dm.internal_id.as_bytes().to_vec());
            ctx.pool.put(dm);
        }
        assert_eq!(ids, vec![b"1".to_vec(), b"2".to_vec(), b"3".to_vec()]);
        searcher.close().unwrap();
    }

    #[test]
    fn test_fuzzy_zero_is_exact() {
        let reader = reader();
        let searcher =
            FuzzySearcher::new(&reader, "body", "tree", 0, 1.0, SearcherOptions::default())
                .unwrap();
        assert_eq!(searcher.expanded_terms(), 1);
    }

    #[test]
    fn test_fuzzy_no_expansion_is_exhausted() {
        let reader = reader();
        let mut searcher =
            FuzzySearcher::new(&reader, "body", "zzzzzz", 1, 1.0, SearcherOptions::default())
                .unwrap();
        assert_eq!(searcher.expanded_terms(), 0);
        let mut ctx = SearchContext::new(1);
        assert!(searcher.next(&mut ctx).unwrap().is_none());
    }
}
