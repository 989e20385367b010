use criterion::{black_box, criterion_group, criterion_main, Criterion};
use service::ratings::RatingSummary;

fn bench_from_rows(c: &mut Criterion) {
    let rows: Vec<i32> = (0..10_000).map(|i| (i % 5) + 1).collect();
    c.bench_function("rating_summary_10k_rows", |b| {
        b.iter(|| RatingSummary::from_rows(black_box(&rows)))
    });
}

criterion_group!(benches, bench_from_rows);
criterion_main!(benches);
