//! Schema loading and reactor benchmarks.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use yangbind_bench::model::{ModelShape, synthetic_model};
use yangbind_codegen::GeneratorReactor;
use yangbind_core::{CodegenTypeBuilderFactory, RuntimeTypeBuilderFactory};
use yangbind_schema::parse_schema_tree;

const SHAPES: [ModelShape; 3] = [
    ModelShape::new(1, 4, 4),
    ModelShape::new(4, 8, 8),
    ModelShape::new(16, 16, 8),
];

fn shape_label(shape: ModelShape) -> String {
    format!("{}x{}x{}", shape.modules, shape.containers, shape.leaves)
}

fn benchmark_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_load");
    for shape in SHAPES {
        let xml = synthetic_model(shape);
        group.throughput(Throughput::Bytes(xml.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(shape_label(shape)), &xml, |b, xml| {
            b.iter(|| parse_schema_tree(black_box(xml)))
        });
    }
    group.finish();
}

fn benchmark_execute(c: &mut Criterion) {
    let mut group = c.benchmark_group("reactor_execute");
    for shape in SHAPES {
        let Ok(tree) = parse_schema_tree(&synthetic_model(shape)) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("codegen", shape_label(shape)), &tree, |b, tree| {
            b.iter(|| {
                let mut reactor = GeneratorReactor::new(black_box(tree));
                let _ = reactor.execute(&mut CodegenTypeBuilderFactory).map(|m| m.len());
            })
        });
        group.bench_with_input(BenchmarkId::new("runtime", shape_label(shape)), &tree, |b, tree| {
            b.iter(|| {
                let mut reactor = GeneratorReactor::new(black_box(tree));
                let _ = reactor.execute(&mut RuntimeTypeBuilderFactory).map(|m| m.len());
            })
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_load, benchmark_execute);
criterion_main!(benches);
