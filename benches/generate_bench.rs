use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fixture_gen::render::render_insert;
use fixture_gen::{FixturePlan, Generator, MemorySink, Scale, Segment};
use forum_fixtures::writer::SqlDumpSink;
use tempfile::TempDir;

fn bench_plan(boards: u64) -> FixturePlan {
    FixturePlan {
        members: 1_000,
        boards,
        reviews: boards / 10,
        root_replies: boards,
        depth1_replies: boards * 3 / 2,
        depth2_replies: boards / 2,
        likes: boards / 2,
        hot_boards: boards / 40,
        hot_reviews: boards / 200,
        ..Scale::Small.plan()
    }
}

fn bench_generate_memory(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_memory");
    group.sample_size(20);

    for boards in [1_000u64, 10_000] {
        let plan = bench_plan(boards);
        group.throughput(Throughput::Elements(plan.total_rows()));
        group.bench_with_input(
            BenchmarkId::new("rows", format!("{}_boards", boards)),
            &plan,
            |b, plan| {
                b.iter(|| {
                    let mut sink = MemorySink::new();
                    Generator::new(42, plan.clone())
                        .generate(&mut sink)
                        .unwrap();
                    sink.total_rows()
                })
            },
        );
    }

    group.finish();
}

fn bench_generate_files(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_files");
    group.sample_size(10);

    for batch_size in [100usize, 1_000] {
        let plan = bench_plan(10_000);
        group.throughput(Throughput::Elements(plan.total_rows()));
        group.bench_with_input(
            BenchmarkId::new("batch_size", batch_size),
            &batch_size,
            |b, &batch_size| {
                b.iter_with_setup(
                    || TempDir::new().unwrap(),
                    |temp_dir| {
                        let mut sink = SqlDumpSink::new(temp_dir.path().to_path_buf(), 42);
                        Generator::new(42, plan.clone())
                            .with_batch_size(batch_size)
                            .generate(&mut sink)
                            .unwrap();
                        sink.total_bytes()
                    },
                )
            },
        );
    }

    group.finish();
}

fn bench_render_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_insert");

    let mut sink = MemorySink::new();
    Generator::new(42, bench_plan(1_000))
        .generate(&mut sink)
        .unwrap();
    let rows = sink.rows(Segment::BookReviews).to_vec();

    group.throughput(Throughput::Elements(rows.len() as u64));
    group.bench_function("book_reviews", |b| {
        b.iter(|| render_insert(Segment::BookReviews.table(), &rows).len())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_generate_memory,
    bench_generate_files,
    bench_render_insert
);
criterion_main!(benches);
