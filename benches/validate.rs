use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use varsentry::{Schema, ValidateOptions, VarRule, VarType, parse, validate};

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    for vars in [16usize, 256, 4_096] {
        let parsed = parse(&make_input(vars));
        let schema = make_schema(vars);
        let options = ValidateOptions::new().strict(true);
        group.bench_with_input(BenchmarkId::from_parameter(vars), &parsed, |b, parsed| {
            b.iter(|| validate(black_box(&parsed.values), black_box(&schema), options));
        });
    }
    group.finish();
}

fn make_input(vars: usize) -> String {
    (0..vars)
        .map(|idx| match idx % 3 {
            0 => format!("VAR_{idx}={idx}\n"),
            1 => format!("VAR_{idx}=true\n"),
            _ => format!("VAR_{idx}=text-{idx}\n"),
        })
        .collect()
}

fn make_schema(vars: usize) -> Schema {
    (0..vars)
        .filter(|idx| idx % 7 != 0)
        .map(|idx| {
            let var_type = match idx % 3 {
                0 => VarType::Number,
                1 => VarType::Boolean,
                _ => VarType::String,
            };
            let rule = VarRule::new()
                .var_type(var_type)
                .validate(|raw| raw.len() < 32);
            (format!("VAR_{idx}"), rule)
        })
        .collect()
}

criterion_group!(benches, bench_validate);
criterion_main!(benches);
