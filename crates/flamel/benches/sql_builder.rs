use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use flamel::{Column, ColumnType, Direction, Filters, ModelDef, Query};

/// SELECT col0, ... FROM t WHERE col0 = ? AND ... ORDER BY col0 ASC LIMIT 10
fn build_query(n: usize) -> Query<'static> {
    let names: Vec<String> = (0..n).map(|i| format!("col{i}")).collect();
    let cols: Vec<&str> = names.iter().map(String::as_str).collect();
    let filters: Filters = names.iter().enumerate().map(|(i, c)| (c.clone(), i as i64)).collect();

    let mut q = Query::new("t");
    q.select(&cols)
        .filter(&filters)
        .and_then(|q| q.order_by(&cols[..1], Direction::Asc))
        .and_then(|q| q.limit(10, None))
        .expect("valid query");
    q
}

fn wide_model(n: usize) -> ModelDef {
    let mut builder = ModelDef::builder("wide")
        .column(Column::new("id", ColumnType::Integer).primary_key().autoincrement());
    for i in 0..n {
        builder = builder.column(
            Column::new(format!("col{i}"), ColumnType::String)
                .not_null()
                .default("x")
                .check(format!("length(col{i}) < 64")),
        );
    }
    builder.build().expect("valid model")
}

fn bench_fluent_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/fluent_query");

    for n in [1, 5, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_query(n).to_string()));
        });
    }

    group.finish();
}

fn bench_create_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/create_table");

    for n in [5, 20, 100] {
        let model = wide_model(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &model, |b, model| {
            b.iter(|| black_box(model.create_table_sql()));
        });
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let sql = build_query(10).sql().unwrap_or_default().to_string();
    c.bench_function("sql_builder/validate_select", |b| {
        b.iter(|| black_box(flamel::is_valid_sql(&sql)));
    });
}

criterion_group!(benches, bench_fluent_query, bench_create_table, bench_validate);
criterion_main!(benches);
