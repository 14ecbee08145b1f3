//! Criterion benchmarks for query execution.
//!
//! Covers the hot paths of the result model:
//! - term and conjunction iteration over synthetic posting lists
//! - match pooling (get/reset/put round trips)
//! - top-k collection

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use kensaku::index::memory::MemoryIndexReader;
use kensaku::search::searcher::{ConjunctionSearcher, Searcher, TermSearcher};
use kensaku::search::{DocumentMatchPool, SearchContext, SearcherOptions, TopScoreCollector};

/// Build an index of `count` documents where every third document contains
/// "alpha" and every fifth contains "beta".
fn build_reader(count: usize) -> MemoryIndexReader {
    let mut reader = MemoryIndexReader::new();
    for i in 0..count {
        let id = format!("{i:08}");
        reader.add_document(&id, id.as_bytes());
        if i % 3 == 0 {
            reader.add_term(id.as_bytes(), "body", "alpha", &[(1, 0, 5)]);
        }
        if i % 5 == 0 {
            reader.add_term(id.as_bytes(), "body", "beta", &[(2, 6, 10)]);
        }
    }
    reader
}

fn bench_term_iteration(c: &mut Criterion) {
    let reader = build_reader(10_000);
    let mut group = c.benchmark_group("term_iteration");
    group.throughput(Throughput::Elements(10_000 / 3));
    group.bench_function("10k_docs", |b| {
        b.iter(|| {
            let mut searcher =
                TermSearcher::new(&reader, "body", "alpha", 1.0, SearcherOptions::default())
                    .unwrap();
            let mut ctx = SearchContext::for_searcher(&searcher);
            let mut hits = 0u64;
            while let Some(dm) = searcher.next(&mut ctx).unwrap() {
                hits += 1;
                ctx.pool.put(dm);
            }
            black_box(hits)
        })
    });
    group.finish();
}

fn bench_conjunction_iteration(c: &mut Criterion) {
    let reader = build_reader(10_000);
    let mut group = c.benchmark_group("conjunction_iteration");
    group.throughput(Throughput::Elements(10_000 / 15));
    group.bench_function("two_terms_10k_docs", |b| {
        b.iter(|| {
            let children: Vec<Box<dyn Searcher>> = vec![
                Box::new(
                    TermSearcher::new(&reader, "body", "alpha", 1.0, SearcherOptions::default())
                        .unwrap(),
                ),
                Box::new(
                    TermSearcher::new(&reader, "body", "beta", 1.0, SearcherOptions::default())
                        .unwrap(),
                ),
            ];
            let mut searcher =
                ConjunctionSearcher::new(children, SearcherOptions::default()).unwrap();
            let mut ctx = SearchContext::for_searcher(&searcher);
            let mut hits = 0u64;
            while let Some(dm) = searcher.next(&mut ctx).unwrap() {
                hits += 1;
                ctx.pool.put(dm);
            }
            black_box(hits)
        })
    });
    group.finish();
}

fn bench_pool_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool");
    group.throughput(Throughput::Elements(1));
    group.bench_function("get_reset_put", |b| {
        let mut pool = DocumentMatchPool::new(16);
        b.iter(|| {
            let mut dm = pool.get();
            dm.internal_id.copy_from(b"0000123456");
            dm.score = 1.5;
            pool.put(black_box(dm));
        })
    });
    group.finish();
}

fn bench_top_k_collection(c: &mut Criterion) {
    let reader = build_reader(10_000);
    let mut group = c.benchmark_group("collector");
    group.bench_function("top_10_of_3k_hits", |b| {
        b.iter(|| {
            let mut searcher =
                TermSearcher::new(&reader, "body", "alpha", 1.0, SearcherOptions::default())
                    .unwrap();
            let mut ctx = SearchContext::for_searcher(&searcher);
            let mut collector = TopScoreCollector::new(10);
            let hits = collector.collect(&mut searcher, &mut ctx, &reader).unwrap();
            black_box(hits.len())
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_term_iteration,
    bench_conjunction_iteration,
    bench_pool_round_trip,
    bench_top_k_collection
);
criterion_main!(benches);
