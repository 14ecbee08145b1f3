//! Per-query execution context and searcher configuration.

use crate::search::pool::DocumentMatchPool;
use crate::search::searcher::Searcher;

/// Configuration surface controlling what searchers populate on a match.
///
/// Both options default to false to minimize per-match memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearcherOptions {
    /// Build explanation trees recording how each score was derived.
    pub explain: bool,
    /// Populate positional term-vector data (locations) on each match.
    pub include_term_vectors: bool,
}

impl SearcherOptions {
    /// Create options with everything disabled.
    pub fn new() -> Self {
        SearcherOptions::default()
    }

    /// Enable explanation trees.
    pub fn with_explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    /// Enable positional term-vector data.
    pub fn with_term_vectors(mut self, include_term_vectors: bool) -> Self {
        self.include_term_vectors = include_term_vectors;
        self
    }
}

/// The context around a single search.
///
/// Created per query and discarded at query end. Owns the query's
/// [`DocumentMatchPool`]; never shared across concurrent queries.
#[derive(Debug)]
pub struct SearchContext {
    /// The pool searchers draw result records from.
    pub pool: DocumentMatchPool,
}

impl SearchContext {
    /// Create a context with a pool pre-sized to `pool_size` records.
    pub fn new(pool_size: usize) -> Self {
        SearchContext {
            pool: DocumentMatchPool::new(pool_size),
        }
    }

    /// Create a context sized for a whole searcher tree, using the root's
    /// declared pool requirement.
    pub fn for_searcher(searcher: &dyn Searcher) -> Self {
        SearchContext::new(searcher.document_match_pool_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default_off() {
        let options = SearcherOptions::new();
        assert!(!options.explain);
        assert!(!options.include_term_vectors);

        let options = options.with_explain(true).with_term_vectors(true);
        assert!(options.explain);
        assert!(options.include_term_vectors);
    }

    #[test]
    fn test_context_pool_sizing() {
        let ctx = SearchContext::new(8);
        assert_eq!(ctx.pool.available(), 8);
    }
}
