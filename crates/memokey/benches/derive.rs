use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use memokey::{derive_key, parse_key, Object, Spread, Value};

fn sample_order() -> Object {
    let items: Vec<Value> = (0..10)
        .map(|i| {
            Value::Object(Object::from([
                ("name", Value::from(format!("item {}", i))),
                ("price", Value::Float(1.99 + i as f64)),
                ("quantity", Value::Int(i + 1)),
            ]))
        })
        .collect();

    Object::from([
        ("orderId", Value::from("a0a4bcdb-8c90-4c5c-8d48-054f354425d0")),
        ("customer", Value::from("Kory")),
        ("items", Value::Array(items)),
    ])
}

fn bench_derive(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_key");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("scalar", |b| {
        b.iter(|| black_box(derive_key(black_box(&123u64)).unwrap()));
    });

    group.bench_function("variadic_8", |b| {
        let args = Spread((1..=8).collect::<Vec<i64>>());
        b.iter(|| black_box(derive_key(black_box(&args)).unwrap()));
    });

    group.bench_function("order_object", |b| {
        let order = sample_order();
        b.iter(|| black_box(derive_key(black_box(&order)).unwrap()));
    });

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_key");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("order_object", |b| {
        let key = derive_key(&sample_order()).unwrap();
        b.iter(|| black_box(parse_key(black_box(key.as_str())).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_derive, bench_parse);
criterion_main!(benches);
