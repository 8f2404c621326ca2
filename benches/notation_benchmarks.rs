//! Benchmarks for notation validation and conversion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use libautomata::notation::{ExpressionConverter, ExpressionValidator, Notation};

/// Build a left-nested infix expression with `terms` operands
fn create_infix(terms: usize) -> String {
    let ops = ['+', '*', '-', '/'];
    let mut expr = "1".to_string();
    for i in 1..terms {
        expr = format!("({}{}{})", expr, ops[i % ops.len()], i + 1);
    }
    expr
}

/// Benchmark: Validation in each notation with growing expressions
fn bench_validate(c: &mut Criterion) {
    let mut validator = ExpressionValidator::new();
    let mut converter = ExpressionConverter::new();
    let mut group = c.benchmark_group("validate");

    for terms in [4, 32, 256].iter() {
        let infix = create_infix(*terms);
        let postfix = converter
            .convert(&infix, Notation::Infix, Notation::Postfix)
            .result_expression
            .unwrap();
        let prefix = converter
            .convert(&infix, Notation::Infix, Notation::Prefix)
            .result_expression
            .unwrap();

        group.throughput(Throughput::Elements(*terms as u64));
        for (notation, expr) in [
            (Notation::Infix, &infix),
            (Notation::Postfix, &postfix),
            (Notation::Prefix, &prefix),
        ] {
            group.bench_with_input(BenchmarkId::new(notation.as_str(), terms), expr, |b, expr| {
                b.iter(|| black_box(validator.validate(black_box(expr), notation).is_valid));
            });
        }
    }
    group.finish();
}

/// Benchmark: All six directed conversions
fn bench_convert(c: &mut Criterion) {
    let mut converter = ExpressionConverter::new();
    let infix = create_infix(64);
    let postfix = converter
        .convert(&infix, Notation::Infix, Notation::Postfix)
        .result_expression
        .unwrap();
    let prefix = converter
        .convert(&infix, Notation::Infix, Notation::Prefix)
        .result_expression
        .unwrap();

    let mut group = c.benchmark_group("convert_64_terms");
    for (source, expr) in [
        (Notation::Infix, &infix),
        (Notation::Postfix, &postfix),
        (Notation::Prefix, &prefix),
    ] {
        for target in Notation::ALL {
            if target == source {
                continue;
            }
            let id = format!("{}_to_{}", source, target);
            group.bench_function(id, |b| {
                b.iter(|| black_box(converter.convert(black_box(expr), source, target).success));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_validate, bench_convert);
criterion_main!(benches);
