//! Performance benchmarks for listings

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use listings::config::LanguageRegistry;
use listings::model::compare;
use listings::readers::{parse_markdown, SourceText};

fn generate_markdown(num_listings: usize, lines_per_listing: usize) -> String {
    let mut md = String::from("# Benchmark Chapter\n\n%%\npath: examples/bench\n%%\n\n");

    for i in 0..num_listings {
        md.push_str(&format!("Listing {} does some work.\n\n", i));
        md.push_str(&format!("```python\n# listing{}.py\n", i));
        for j in 0..lines_per_listing {
            md.push_str(&format!("print('Listing {} line {}')\n", i, j));
        }
        md.push_str("```\n\n");
        if i % 10 == 0 {
            md.push_str("%%\nA note for the editor\n%%\n\n");
        }
    }

    md
}

fn generate_source(lines: usize, every: usize) -> String {
    let mut src = String::from("# bench.py\n");
    for i in 0..lines {
        src.push_str(&format!("value_{} = {}\n", i, i));
        if every > 0 && i % every == 0 {
            src.push('\n');
        }
    }
    src
}

fn bench_parse_markdown(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_markdown");
    let registry = LanguageRegistry::builtin();

    for num_listings in [10, 50, 100, 500].iter() {
        let md = generate_markdown(*num_listings, 10);
        group.bench_with_input(
            BenchmarkId::new("listings", num_listings),
            &md,
            |b, md| {
                b.iter(|| {
                    let mut source = SourceText::from_text(black_box(md.as_str()), None);
                    parse_markdown(&mut source, &registry).unwrap()
                })
            },
        );
    }

    group.finish();
}

fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare");

    for lines in [10, 100, 500].iter() {
        let embedded = generate_source(*lines, 0);
        let on_disk = generate_source(*lines, 7);
        group.bench_with_input(
            BenchmarkId::new("whitespace_only", lines),
            &(embedded, on_disk),
            |b, (embedded, on_disk)| b.iter(|| compare(black_box(embedded), black_box(on_disk))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_parse_markdown, bench_compare);

criterion_main!(benches);
