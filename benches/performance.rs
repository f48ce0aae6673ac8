use criterion::{black_box, criterion_group, criterion_main, Criterion};
use iquery::prelude::*;

fn make_records(rows: usize) -> Vec<String> {
    (0..rows)
        .map(|i| format!("record-{}-{}", i % 97, i))
        .collect()
}

fn bench_filter_sort_window(c: &mut Criterion) {
    let mut q = Pipeline::new(make_records(10_000));
    q.add_filter(Predicate::from_value(|s: &String| s.ends_with('7')))
        .add_sort_by(Comparator::by_key(|s: &String| s.len()))
        .add_sort_by(Comparator::natural());
    q.set_offset(10).unwrap().set_limit(50).unwrap();

    c.bench_function("filter_sort_window", |b| {
        b.iter(|| black_box(q.fetch_all()))
    });
}

fn bench_lazy_first_page(c: &mut Criterion) {
    let mut q = Pipeline::new(make_records(10_000));
    q.add_filter(Predicate::from_value(|s: &String| s.contains("-3")));
    q.set_limit(10).unwrap();

    c.bench_function("lazy_first_page", |b| b.iter(|| black_box(q.fetch_all())));
}

criterion_group!(benches, bench_filter_sort_window, bench_lazy_first_page);
criterion_main!(benches);
