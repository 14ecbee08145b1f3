//! Numeric range matching by term-dictionary expansion.

use std::mem;

use crate::error::Result;
use crate::index::IndexReader;
use crate::search::context::{SearchContext, SearcherOptions};
use crate::search::document_match::DocumentMatch;
use crate::search::searcher::{DisjunctionSearcher, Searcher, TermSearcher};

/// A searcher matching documents whose numeric field value falls inside a
/// range.
///
/// The field's term dictionary is scanned for terms that parse as numbers
/// inside the requested interval; evaluation delegates to a disjunction of
/// term searchers over those terms. An unset bound is unbounded on that
/// side.
#[derive(Debug)]
pub struct NumericRangeSearcher {
    inner: DisjunctionSearcher,
}

impl NumericRangeSearcher {
    /// Create a numeric range searcher over `field`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reader: &dyn IndexReader,
        field: &str,
        min: Option<f64>,
        max: Option<f64>,
        inclusive_min: bool,
        inclusive_max: bool,
        boost: f64,
        options: SearcherOptions,
    ) -> Result<Self> {
        let mut children: Vec<Box<dyn Searcher>> = Vec::new();
        for term in reader.field_terms(field)? {
            let value: f64 = match term.parse() {
                Ok(value) => value,
                Err(_) => continue,
            };
            if !lower_ok(value, min, inclusive_min) || !upper_ok(value, max, inclusive_max) {
                continue;
            }
            children.push(Box::new(TermSearcher::new(
                reader, field, term, boost, options,
            )?));
        }
        Ok(NumericRangeSearcher {
            inner: DisjunctionSearcher::new(children, 1, options),
        })
    }
}

fn lower_ok(value: f64, min: Option<f64>, inclusive: bool) -> bool {
    match min {
        Some(min) if inclusive => value >= min,
        Some(min) => value > min,
        None => true,
    }
}

fn upper_ok(value: f64, max: Option<f64>, inclusive: bool) -> bool {
    match max {
        Some(max) if inclusive => value <= max,
        Some(max) => value < max,
        None => true,
    }
}

impl Searcher for NumericRangeSearcher {
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
        for (id, price) in [(b"1", "5"), (b"2", "10"), (b"3", "15"), (b"4", "20")] {
            reader.add_document(&String::from_utf8_lossy(id), id);
            reader.add_term(id, "price", price, &[]);
        }
        reader
    }

    fn drain_ids(searcher: &mut dyn Searcher) -> Vec<Vec<u8>> {
        let mut ctx = SearchContext::for_searcher(searcher);
        let mut ids = Vec::new();
        while let Some(dm) = searcher.next(&mut ctx).unwrap() {
            ids.push(dm.internal_id.as_bytes().to_vec());
            ctx.pool.put(dm);
        }
        ids
    }

    #[test]
    fn test_range_inclusive_bounds() {
        let reader = reader();
        let mut searcher = NumericRangeSearcher::new(
            &reader,
            "price",
            Some(10.0),
            Some(15.0),
            true,
            true,
            1.0,
            SearcherOptions::default(),
        )
        .unwrap();
        assert_eq!(drain_ids(&mut searcher), vec![b"2".to_vec(), b"3".to_vec()]);
    }

    #[test]
    fn test_range_exclusive_bounds() {
        let reader = reader();
        let mut searcher = NumericRangeSearcher::new(
            &reader,
            "price",
            Some(5.0),
            Some(20.0),
            false,
            false,
            1.0,
            SearcherOptions::default(),
        )
        .unwrap();
        assert_eq!(drain_ids(&mut searcher), vec![b"2".to_vec(), b"3".to_vec()]);
    }

    #[test]
    fn test_range_open_ended() {
        let reader = reader();
        let mut searcher = NumericRangeSearcher::new(
            &reader,
            "price",
            Some(15.0),
            None,
            true,
            true,
            1.0,
            SearcherOptions::default(),
        )
        .unwrap();
        assert_eq!(drain_ids(&mut searcher), vec![b"3".to_vec(), b"4".to_vec()]);
    }

    #[test]
    fn test_range_skips_non_numeric_terms() {
        let mut reader = reader();
        reader.add_document("5", b"5");
        reader.add_term(b"5", "price", "cheap", &[]);
        let mut searcher = NumericRangeSearcher::new(
            &reader,
            "price",
            None,
            None,
            true,
            true,
            1.0,
            SearcherOptions::default(),
        )
        .unwrap();
        assert_eq!(
            drain_ids(&mut searcher),
            vec![b"1".to_vec(), b"2".to_vec(), b"3".to_vec(), b"4".to_vec()]
        );
    }
}
