use criterion::{criterion_group, criterion_main, Criterion};
use search_core::{DocumentPredicate, DocumentStatus, ExecutionMode, SearchIndex, StopWords};

fn corpus() -> SearchIndex {
    let words: Vec<String> = (0..2_000).map(|i| format!("w{i}")).collect();
    let mut idx = SearchIndex::new(StopWords::from_text("w0 w1 w2").unwrap());
    for id in 0..10_000 {
        let text: Vec<&str> = (0..50).map(|k| words[(id * 7919 + k * 104_729) as usize % words.len()].as_str()).collect();
        idx.add_document(id, &text.join(" "), DocumentStatus::Actual, &[id % 10]).unwrap();
    }
    idx
}

fn bench_ranking(c: &mut Criterion) {
    let idx = corpus();
    let query = (3..60).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ") + " -w61 -w62";
    let pred = DocumentPredicate::default();
    c.bench_function("rank_sequential", |b| {
        b.iter(|| idx.find_top_documents_with(ExecutionMode::Sequential, &query, &pred))
    });
    c.bench_function("rank_parallel", |b| {
        b.iter(|| idx.find_top_documents_with(ExecutionMode::Parallel, &query, &pred))
    });
    c.bench_function("match_parallel", |b| {
        b.iter(|| idx.match_document_with(ExecutionMode::Parallel, &query, 4_242))
    });
}

criterion_group!(benches, bench_ranking);
criterion_main!(benches);
