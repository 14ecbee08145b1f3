//! Phrase matching on top of a conjunction of term searchers.

use std::mem;

use crate::error::{KensakuError, Result};
use crate::index::IndexReader;
use crate::search::context::{SearchContext, SearcherOptions};
use crate::search::document_match::DocumentMatch;
use crate::search::searcher::{ConjunctionSearcher, Searcher, TermSearcher};

/// A searcher matching documents where the given terms occur at
/// consecutive positions in one field.
///
/// Candidates come from a conjunction of the phrase terms with term
/// vectors forced on; each candidate is then verified positionally and
/// discarded when no consecutive run exists.
#[derive(Debug)]
pub struct PhraseSearcher {
    inner: ConjunctionSearcher,
    field: String,
    terms: Vec<String>,
    done: bool,
}

impl PhraseSearcher {
    /// Create a phrase searcher for consecutive `terms` in `field`.
    pub fn new<F>(
        reader: &dyn IndexReader,
        field: F,
        terms: Vec<String>,
        boost: f64,
        options: SearcherOptions,
    ) -> Result<Self>
    where
        F: Into<String>,
    {
        if terms.is_empty() {
            return Err(KensakuError::query(
                "phrase searcher requires at least one term",
            ));
        }
        let field = field.into();
        // Positional verification needs the locations regardless of what
        // the caller asked for.
        let inner_options = options.with_term_vectors(true);
        let mut children: Vec<Box<dyn Searcher>> = Vec::with_capacity(terms.len());
        for term in &terms {
            children.push(Box::new(TermSearcher::new(
                reader,
                field.clone(),
                term.clone(),
                boost,
                inner_options,
            )?));
        }
        Ok(PhraseSearcher {
            inner: ConjunctionSearcher::new(children, inner_options)?,
            field,
            terms,
            done: false,
        })
    }

    /// Check whether the candidate's locations contain the terms at
    /// consecutive positions.
    fn phrase_matches(&self, dm: &DocumentMatch) -> bool {
        let terms_map = match dm.locations.get(&self.field) {
            Some(map) => map,
            None => return false,
        };
        let first = match terms_map.get(&self.terms[0]) {
            Some(locations) => locations,
            None => return false,
        };
        'candidate: for location in first {
            for (offset, term) in self.terms.iter().enumerate().skip(1) {
                let want = location.pos + offset as u64;
                let found = terms_map
                    .get(term)
                    .map(|locations| locations.iter().any(|l| l.pos == want))
                    .unwrap_or(false);
                if !found {
                    continue 'candidate;
                }
            }
            return true;
        }
        false
    }

    fn filter(
        &mut self,
        ctx: &mut SearchContext,
        mut candidate: Option<DocumentMatch>,
    ) -> Result<Option<DocumentMatch>> {
        loop {
            let dm = match candidate.take() {
                Some(dm) => dm,
                None => {
                    self.done = true;
                    return Ok(None);
                }
            };
            if self.phrase_matches(&dm) {
                return Ok(Some(dm));
            }
            ctx.pool.put(dm);
            candidate = self.inner.next(ctx)?;
        }
    }
}

impl Searcher for PhraseSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        if self.done {
            return Ok(None);
        }
        let candidate = self.inner.next(ctx)?;
        self.filter(ctx, candidate)
    }

    fn advance(&mut self, ctx: &mut SearchContext, target: &[u8]) -> Result<Option<DocumentMatch>> {
        if self.done {
            return Ok(None);
        }
        let candidate = self.inner.advance(ctx, target)?;
        self.filter(ctx, candidate)
    }

    fn close(&mut self) -> Result<()> {
        self.done = true;
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
        mem::size_of::<Self>()
            + self.field.len()
            + self.terms.iter().map(|t| t.len()).sum::<usize>()
            + self.inner.size_in_bytes()
    }

    fn document_match_pool_size(&self) -> usize {
        1 + self.inner.document_match_pool_size()
    }
}
