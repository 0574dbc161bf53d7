//! Benchmarks for stage listing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stages_api::handlers::StageListHandler;
use stages_api::testing::{pipeline_id, StoreFixture};
use stages_api::validation::parse_pipeline_id;

fn list_stages_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    let handler = StageListHandler::new(StoreFixture::example().lookups());
    c.bench_function("list_stages_example", |b| {
        b.to_async(&runtime)
            .iter(|| async { black_box(handler.list(pipeline_id(123), None).await.unwrap()) });
    });

    let mut fixture = StoreFixture::example();
    for n in 0..500u32 {
        fixture = fixture.with_event(1_000 + u64::from(n), 123, 60 + n);
    }
    for n in 0..50u64 {
        fixture = fixture.with_stage(10_000 + n, 123, 1_499, "bulk");
    }
    let handler = StageListHandler::new(fixture.lookups());
    c.bench_function("list_stages_many_events", |b| {
        b.to_async(&runtime)
            .iter(|| async { black_box(handler.list(pipeline_id(123), None).await.unwrap()) });
    });

    c.bench_function("parse_pipeline_id", |b| {
        b.iter(|| black_box(parse_pipeline_id(black_box("1234567")).unwrap()));
    });
}

criterion_group!(benches, list_stages_benchmark);
criterion_main!(benches);
