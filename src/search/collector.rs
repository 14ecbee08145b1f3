//! Collectors that drive a searcher to completion.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::index::IndexReader;
use crate::search::context::SearchContext;
use crate::search::document_match::{DocumentMatch, DocumentMatchCollection};
use crate::search::mem_tracker::MemTracker;
use crate::search::searcher::{apply_query_norm, Searcher};
use crate::search::size;

// Heap entry ordered so the maximum is the worst retained hit: lowest
// score first, then latest hit number.
#[derive(Debug)]
struct HeapEntry(DocumentMatch);

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .score
            .total_cmp(&self.0.score)
            .then_with(|| self.0.hit_number.cmp(&other.0.hit_number))
    }
}

/// Collects the top `size` hits by score, after `skip` skipped hits.
///
/// Retention is a bounded min-heap of `size + skip` records; everything
/// evicted goes straight back to the context pool so the working set stays
/// proportional to the requested page, not to the total hit count.
#[derive(Debug)]
pub struct TopScoreCollector {
    size: usize,
    skip: usize,
    heap: BinaryHeap<HeapEntry>,
    total_hits: u64,
    max_score: f64,
    took: Duration,
    mem_tracker: MemTracker,
}

impl TopScoreCollector {
    /// Create a collector retaining the `size` best hits.
    pub fn new(size: usize) -> Self {
        TopScoreCollector::with_skip(size, 0)
    }

    /// Create a collector retaining the `size` best hits after skipping
    /// the first `skip`.
    pub fn with_skip(size: usize, skip: usize) -> Self {
        TopScoreCollector {
            size,
            skip,
            heap: BinaryHeap::with_capacity(size + skip + 1),
            total_hits: 0,
            max_score: 0.0,
            took: Duration::ZERO,
            mem_tracker: MemTracker::new(),
        }
    }

    /// Drive the searcher to exhaustion and return the retained page,
    /// sorted by descending score with ties broken by arrival order.
    /// External document ids are resolved through the reader.
    pub fn collect(
        &mut self,
        searcher: &mut dyn Searcher,
        ctx: &mut SearchContext,
        reader: &dyn IndexReader,
    ) -> Result<DocumentMatchCollection> {
        let start = Instant::now();
        apply_query_norm(searcher);

        let capacity = self.size + self.skip;
        let mut hit_number = 0u64;
        while let Some(mut dm) = searcher.next(ctx)? {
            hit_number += 1;
            dm.hit_number = hit_number;
            self.total_hits += 1;
            if dm.score > self.max_score {
                self.max_score = dm.score;
            }

            if capacity == 0 {
                ctx.pool.put(dm);
                continue;
            }
            let entry = HeapEntry(dm);
            if self.heap.len() < capacity {
                self.heap.push(entry);
            } else if let Some(worst) = self.heap.peek() {
                if entry < *worst {
                    if let Some(evicted) = self.heap.pop() {
                        ctx.pool.put(evicted.0);
                    }
                    self.heap.push(entry);
                } else {
                    ctx.pool.put(entry.0);
                }
            }
        }
        searcher.close()?;

        let mut collection = DocumentMatchCollection::new();
        let mut retained: Vec<DocumentMatch> =
            self.heap.drain().map(|entry| entry.0).collect();
        retained.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.hit_number.cmp(&b.hit_number))
        });
        for (n, mut dm) in retained.into_iter().enumerate() {
            if n < self.skip {
                ctx.pool.put(dm);
                continue;
            }
            match reader.external_id(dm.internal_id.as_bytes())? {
                Some(id) => dm.id = id,
                None => dm.id = dm.internal_id.to_string(),
            }
            collection.push(dm);
        }

        self.mem_tracker.add(searcher.size_in_bytes() as u64);
        self.mem_tracker.add(ctx.pool.size_in_bytes() as u64);
        self.mem_tracker
            .add((collection.size_in_bytes() + size::SEARCH_CONTEXT_OVERHEAD) as u64);
        self.took = start.elapsed();
        Ok(collection)
    }

    /// Total number of documents the searcher matched, retained or not.
    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    /// Highest score seen across all hits.
    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    /// Wall-clock duration of the last `collect` call.
    pub fn took(&self) -> Duration {
        self.took
    }

    /// Bytes attributed to the last `collect` call.
    pub fn mem_usage(&self) -> u64 {
        self.mem_tracker.usage()
    }
}

/// Counts matching documents without retaining any of them.
#[derive(Debug, Default)]
pub struct CountCollector {
    total_hits: u64,
    took: Duration,
}

impl CountCollector {
    /// Create a count collector.
    pub fn new() -> Self {
        CountCollector::default()
    }

    /// Drive the searcher to exhaustion, releasing every match back to the
    /// pool, and return the hit count.
    pub fn collect(
        &mut self,
        searcher: &mut dyn Searcher,
        ctx: &mut SearchContext,
    ) -> Result<u64> {
        let start = Instant::now();
        while let Some(dm) = searcher.next(ctx)? {
            self.total_hits += 1;
            ctx.pool.put(dm);
        }
        searcher.close()?;
        self.took = start.elapsed();
        Ok(self.total_hits)
    }

    /// Total number of documents counted.
    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    /// Wall-clock duration of the last `collect` call.
    pub fn took(&self) -> Duration {
        self.took
    }
}
