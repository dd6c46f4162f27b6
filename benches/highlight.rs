use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use kg::RowStore;

fn c_source(rows: usize) -> RowStore {
    let mut store = RowStore::new();
    for i in 0..rows {
        let line = format!("\tint value_{} = {} * 2; // \"text\"", i, i);
        store.insert_row(i, line.as_bytes()).unwrap();
    }
    store.set_filename("bench.c");
    store
}

fn bench_comment_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("highlight");
    group.bench_function("open_comment_on_first_of_5000_rows", |b| {
        b.iter_batched(
            || c_source(5000),
            |mut store| {
                store.insert_byte(0, 0, b'*').unwrap();
                store.insert_byte(0, 0, b'/').unwrap();
                black_box(store)
            },
            BatchSize::LargeInput,
        );
    });
    group.bench_function("full_pass_5000_rows", |b| {
        b.iter_batched(
            || c_source(5000),
            |mut store| {
                store.set_profile(kg::select_profile("bench.rs"));
                black_box(store)
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_comment_propagation);
criterion_main!(benches);
