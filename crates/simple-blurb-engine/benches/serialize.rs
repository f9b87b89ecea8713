use criterion::{Criterion, criterion_group, criterion_main};
use simple_blurb_engine::{BlockRegistry, blocks::blurb_content};
mod common;

fn bench_block_markup(c: &mut Criterion) {
    let mut group = c.benchmark_group("blurb_content");
    group.sample_size(10);

    let attributes = common::sample_blurb(7);
    let markup = attributes.save().render();

    group.bench_function("save", |b| {
        b.iter(|| std::hint::black_box(std::hint::black_box(&attributes).save().render()));
    });

    group.bench_function("extract", |b| {
        b.iter(|| std::hint::black_box(blurb_content::from_markup(std::hint::black_box(&markup))));
    });

    group.finish();
}

fn bench_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("document");
    group.sample_size(10);

    let registry = BlockRegistry::with_defaults();
    let source = common::generate_document(100);
    let document = registry.parse_document(&source);

    group.bench_function("parse_100_blurbs", |b| {
        b.iter(|| std::hint::black_box(registry.parse_document(std::hint::black_box(&source))));
    });

    group.bench_function("serialize_100_blurbs", |b| {
        b.iter(|| {
            std::hint::black_box(registry.serialize_document(std::hint::black_box(&document)))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_block_markup, bench_document);
criterion_main!(benches);
