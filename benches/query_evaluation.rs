use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tabhop::models::{TabId, TabSnapshot};
use tabhop::ordering::order_tabs;
use tabhop::query::QueryEngine;
use tabhop::recency::RecencyLog;

/// Generate synthetic tabs spread over a handful of sites
fn generate_tabs(num_tabs: usize) -> Vec<TabSnapshot> {
    let sites = [
        ("github.com", "Pull requests"),
        ("docs.rs", "Crate documentation"),
        ("mail.example.com", "Inbox"),
        ("news.ycombinator.com", "Hacker News"),
        ("en.wikipedia.org", "Wikipedia article"),
        ("chat.example.com", "Team chat"),
    ];

    (0..num_tabs)
        .map(|i| {
            let (host, title) = sites[i % sites.len()];
            TabSnapshot::new(i as TabId + 1, (i % 4) as u64 + 1)
                .with_title(format!("{} {}", title, i))
                .with_url(format!("https://{}/page/{}", host, i))
                .pinned(i % 17 == 0)
        })
        .collect()
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for size in [100, 1_000, 5_000].iter() {
        let tabs = generate_tabs(*size);
        group.throughput(Throughput::Elements(*size as u64));

        for query in ["", "pinned:true domain:example", "docs", "gh pull"] {
            let id = BenchmarkId::new(if query.is_empty() { "<empty>" } else { query }, size);
            group.bench_with_input(id, &tabs, |b, tabs| {
                let mut engine = QueryEngine::default();
                b.iter(|| engine.evaluate(black_box(tabs), black_box(query)).len());
            });
        }
    }

    group.finish();
}

fn bench_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordering");

    for size in [100, 1_000, 5_000].iter() {
        let tabs = generate_tabs(*size);
        // Ten activations per tab, heavily duplicated
        let mut log = RecencyLog::new();
        for i in 0..size * 10 {
            log.record_activation((i * 7 % size) as TabId + 1);
        }
        let raw = log.snapshot();
        log.compact();
        let compacted = log.snapshot();

        group.bench_with_input(BenchmarkId::new("raw_log", size), &raw, |b, recent| {
            b.iter(|| order_tabs(black_box(recent), tabs.clone()).len());
        });
        group.bench_with_input(BenchmarkId::new("compacted_log", size), &compacted, |b, recent| {
            b.iter(|| order_tabs(black_box(recent), tabs.clone()).len());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_ordering);
criterion_main!(benches);
