use criterion::{Criterion, criterion_group, criterion_main};
use mazmundama_engine::{Granularity, PipelineOptions, html::parse_html, process_html};
mod common;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.sample_size(10);

    let content = common::generate_html_content(200);
    group.bench_function("parse_html", |b| {
        b.iter(|| {
            let parsed = parse_html(std::hint::black_box(&content));
            std::hint::black_box(parsed);
        });
    });

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    let content = common::generate_full_document(50);
    for granularity in [Granularity::Block, Granularity::Sentence] {
        let options = PipelineOptions {
            granularity,
            ..PipelineOptions::default()
        };
        group.bench_function(format!("{granularity:?}").to_lowercase(), |b| {
            b.iter(|| {
                let doc = process_html(std::hint::black_box(&content), &options).unwrap();
                std::hint::black_box(doc);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_pipeline);
criterion_main!(benches);
