//! Rule parsing and evaluation benchmarks
//!
//! Measures rule text parsing, single-field validation and whole-form runs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ruleform_validate::prelude::*;
use std::collections::HashMap;

/// Benchmark parsing rule text into tokens
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_rule_spec");

    for (name, text) in [
        ("single", "NOTEMPTY"),
        ("bracketed", "[NOTEMPTY, L>=6, L<=32]"),
        ("mixed", "optional, numeric, V>=18, V<=120, L!=other"),
        ("malformed", "BOGUS, L=>3, , NOTEMPTY"),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
            b.iter(|| parse_rule_spec(black_box(text)))
        });
    }

    group.finish();
}

/// Benchmark validating one field
fn bench_validate_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_field");
    let engine = ValidationEngine::default();
    let lookup = HashMap::from([("confirm".to_string(), "correct horse".to_string())]);

    let predefined = parse_rule_spec("NOTEMPTY, EMAIL");
    group.bench_function("email_pass", |b| {
        b.iter(|| {
            engine.validate_field(
                "user[email]",
                black_box("jo@example.com"),
                &predefined,
                &FieldOptions::new(),
                &NoFields,
            )
        })
    });

    let comparisons = parse_rule_spec("L>=8, V==confirm");
    group.bench_function("cross_field", |b| {
        b.iter(|| {
            engine.validate_field(
                "password",
                black_box("correct horse"),
                &comparisons,
                &FieldOptions::new(),
                &lookup,
            )
        })
    });

    let failing = parse_rule_spec("NOTEMPTY, NUMERIC, L>=4, V>=1000");
    for stop in [true, false] {
        let options = FieldOptions::new().stop_at_first(stop);
        let label = if stop { "fail_first" } else { "fail_all" };
        group.bench_function(label, |b| {
            b.iter(|| engine.validate_field("pin", black_box(""), &failing, &options, &NoFields))
        });
    }

    group.finish();
}

fn signup_form(size: usize) -> Form {
    let mut form = Form::new()
        .field(FieldSpec::new("password", "correct horse").validation("NOTEMPTY, L>=8"))
        .field(FieldSpec::new("confirm", "correct horse").validation("V==password"));
    for i in 0..size {
        form = form.field(
            FieldSpec::new(format!("item[{i}][qty]"), if i % 3 == 0 { "x" } else { "12" })
                .validation("OPTIONAL, NUMERIC, V<=100")
                .regex("/[<>]/"),
        );
    }
    form
}

/// Benchmark validating whole forms
fn bench_validate_form(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_form");
    let engine = ValidationEngine::default();

    for size in [10, 100] {
        let form = signup_form(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &form, |b, form| {
            b.iter(|| engine.validate_form(black_box(form)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_validate_field, bench_validate_form);
criterion_main!(benches);
