use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use melingo::analyzer::summarize;
use melingo::engine::fallback_decision;
use melingo::types::TrackingEvent;

const EVENT_TYPES: [&str; 4] = ["page_view", "click", "add_to_cart", "scroll"];
const PAGE_TYPES: [&str; 4] = ["home", "product", "cart", "collection"];

fn build_events(size: usize) -> Vec<TrackingEvent> {
    (0..size)
        .map(|i| {
            TrackingEvent::new("bench", EVENT_TYPES[i % 4], i as f64 * 1.5)
                .with_page(PAGE_TYPES[(i / 4) % 4], format!("/page/{i}"))
        })
        .collect()
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize");

    for size in [10usize, 100, 1_000] {
        let events = build_events(size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let summary = summarize(black_box(&events));
                black_box(fallback_decision(&summary));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_summarize);
criterion_main!(benches);
