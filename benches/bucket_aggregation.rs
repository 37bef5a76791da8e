/// Bucket aggregation benchmarks
///
/// Measures building the four per-granularity bucket maps for traces of
/// increasing size, and rendering the full figure in memory.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::path::Path;

use wta_stats::arrival::{aggregate_all, ArrivalRecord};
use wta_stats::job_arrival::JobArrivalGraph;

/// Pseudo-random but deterministic submit times spread over ~10 days
fn synthetic_trace(jobs: usize) -> Vec<ArrivalRecord> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..jobs)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            ArrivalRecord::new(state % 864_000)
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_all");

    for jobs in [1_000usize, 10_000, 100_000] {
        let trace = synthetic_trace(jobs);
        group.throughput(Throughput::Elements(jobs as u64));
        group.bench_with_input(BenchmarkId::from_parameter(jobs), &trace, |b, trace| {
            b.iter(|| aggregate_all(black_box(trace)));
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let trace = synthetic_trace(10_000);

    c.bench_function("render_10k_jobs", |b| {
        b.iter(|| JobArrivalGraph::new("bench", black_box(&trace), Path::new(".")).render());
    });
}

criterion_group!(benches, bench_aggregate, bench_render);
criterion_main!(benches);
