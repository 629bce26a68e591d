use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlweave::prelude::*;
use sqlweave::{SafeStr, SelectBuilder, placeholders};

/// SELECT col0, col1, ... FROM t WHERE col0 = ? AND col1 = ? ...
fn build_select(n: usize) -> SelectBuilder {
    let columns: Vec<String> = (0..n).map(|i| format!("col{i}")).collect();
    let mut q = select(columns.iter().cloned().map(SafeStr::dangerously_from_dynamic))
        .from("t")
        .placeholder_format(PlaceholderFormat::DOLLAR);
    for (i, column) in columns.into_iter().enumerate() {
        let template = SafeStr::dangerously_from_dynamic(format!("{column} = ?"));
        q = q.and_where(Expr::with_args(template, vec![Arg::bind(i as i64)]));
    }
    q
}

fn bench_to_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/to_sql");

    for n in [1, 5, 10, 50, 100] {
        let q = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &q, |b, q| {
            b.iter(|| black_box(q.to_sql()));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_select(n).to_sql()));
        });
    }

    group.finish();
}

fn bench_eq_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/eq_in_list");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| black_box(Eq::new().with("id", values.clone()).to_sql()));
        });
    }

    group.finish();
}

fn bench_nested_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/nested_expansion");

    for depth in [1, 4, 16] {
        let mut inner = select(["id"]).from("t0").and_where(Gt::new().with("v", 0i64));
        for level in 1..depth {
            inner = select(["id"])
                .from("t")
                .and_where(Eq::new().with("level", level as i64))
                .and_where(Expr::new("id IN (?)").nest(inner));
        }
        let q = inner.placeholder_format(PlaceholderFormat::DOLLAR);

        group.bench_with_input(BenchmarkId::from_parameter(depth), &q, |b, q| {
            b.iter(|| black_box(q.to_sql()));
        });
    }

    group.finish();
}

fn bench_replace_placeholders(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/replace_placeholders");

    for n in [10, 100, 1000] {
        let sql = format!("SELECT * FROM t WHERE id IN ({})", placeholders(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &sql, |b, sql| {
            b.iter(|| black_box(PlaceholderFormat::DOLLAR.replace_placeholders(sql)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_to_sql,
    bench_build_and_render,
    bench_eq_in_list,
    bench_nested_expansion,
    bench_replace_placeholders
);
criterion_main!(benches);
