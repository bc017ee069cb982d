use criterion::{criterion_group, criterion_main, Criterion};
use exiftool_process::parser::parse_tags;
use exiftool_process::{Command, ExecutionResult, Format, Tag};
use std::hint::black_box;
use std::path::Path;

fn sample_output() -> String {
    Tag::ALL
        .iter()
        .map(|tag| format!("{}: value of {}\n", tag.name(), tag.name()))
        .collect()
}

fn bench_exiftool(c: &mut Criterion) {
    let executable = Path::new("exiftool");
    let image = Path::new("data/image.jpg");

    c.bench_function("build read command", |b| {
        b.iter(|| {
            Command::read(
                black_box(executable),
                black_box(image),
                Format::Numeric,
                black_box(Tag::ALL),
            )
            .unwrap()
        })
    });

    let result = ExecutionResult::success(sample_output());
    c.bench_function("parse all tags", |b| {
        b.iter(|| parse_tags(black_box(&result), black_box(Tag::ALL)).unwrap())
    });

    let meta = parse_tags(&result, Tag::ALL).unwrap();
    c.bench_function("typed values", |b| {
        b.iter(|| {
            Tag::ALL
                .iter()
                .filter_map(|tag| black_box(&meta).value(*tag))
                .count()
        })
    });
}

criterion_group!(benches, bench_exiftool);
criterion_main!(benches);
