//! Benchmarks for fixture construction.
//!
//! Measures the cost of the hot paths:
//! - Unique leaf value generation per kind
//! - Realizing a nested class graph
//! - Mock interception and invocation recording

extern crate specimen;

use criterion::{criterion_group, criterion_main, Criterion};
use specimen::prelude::*;
use std::hint::black_box;
use std::sync::Arc;

/// Benchmark raw unique generation for the common leaf kinds.
fn bench_unique_generation(c: &mut Criterion) {
    let source = UniqueSource::new();

    c.bench_function("unique_i32", |b| {
        b.iter(|| black_box(source.next_primitive(PrimitiveKind::I4)));
    });
    c.bench_function("unique_string_guid", |b| {
        b.iter(|| black_box(source.next_primitive(PrimitiveKind::String)));
    });
    c.bench_function("unique_char", |b| {
        b.iter(|| black_box(source.next_primitive(PrimitiveKind::Char)));
    });
}

/// Benchmark building a three-level class graph with mixed member kinds.
fn bench_class_graph_build(c: &mut Criterion) {
    let registry = TypeRegistry::new();
    let string = registry.primitive(PrimitiveKind::String);
    let i4 = registry.primitive(PrimitiveKind::I4);
    let items = registry.list_of(i4).unwrap();

    let address = DescriptorBuilder::class(&registry, "Address")
        .ctor(&[("street", string), ("zip", i4)])
        .finish()
        .unwrap();
    let person = DescriptorBuilder::class(&registry, "Person")
        .ctor(&[("name", string), ("home", address)])
        .property("Nickname", string)
        .finish()
        .unwrap();
    let order = DescriptorBuilder::class(&registry, "Order")
        .ctor(&[("id", i4), ("customer", person)])
        .property("Lines", items)
        .finish()
        .unwrap();

    c.bench_function("build_class_graph", |b| {
        let mut fixture = Fixture::new(registry.clone(), order).unwrap();
        b.iter(|| black_box(fixture.build().unwrap()));
    });

    c.bench_function("build_many_100", |b| {
        let mut fixture = Fixture::new(registry.clone(), order).unwrap();
        b.iter(|| black_box(fixture.build_many(100).unwrap()));
    });
}

/// Benchmark mock construction, interception, and verification.
fn bench_mock_interception(c: &mut Criterion) {
    let registry = TypeRegistry::new();
    let i4 = registry.primitive(PrimitiveKind::I4);
    let string = registry.primitive(PrimitiveKind::String);
    let repo = DescriptorBuilder::interface(&registry, "IRepository")
        .method("find", &[("id", i4)], Some(string))
        .finish()
        .unwrap();

    c.bench_function("build_mock", |b| {
        let mut fixture = Fixture::new(registry.clone(), repo).unwrap();
        b.iter(|| black_box(fixture.build().unwrap()));
    });

    c.bench_function("mock_call_recorded", |b| {
        let mut fixture = Fixture::new(registry.clone(), repo).unwrap();
        let built = fixture.build().unwrap();
        let mock = Arc::clone(built.as_mock().unwrap());
        b.iter(|| black_box(mock.call("find", &[Value::I4(1)]).unwrap()));
    });

    c.bench_function("verify_called_1000", |b| {
        let mut fixture = Fixture::new(registry.clone(), repo).unwrap();
        let (built, scope) = fixture.build_with_scope().unwrap();
        let mock = built.as_mock().unwrap();
        for n in 0..1000 {
            mock.call("find", &[Value::I4(n)]).unwrap();
        }
        b.iter(|| {
            black_box(scope.verify("find").unwrap().count());
        });
    });
}

criterion_group!(
    benches,
    bench_unique_generation,
    bench_class_graph_build,
    bench_mock_interception
);
criterion_main!(benches);
