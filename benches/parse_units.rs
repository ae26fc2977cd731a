//! Hot-path parsing benchmarks: these run once per measurement row, so they
//! dominate ingest time for large result sets.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use codeglyphx_bench_report::labels::parse_label;
use codeglyphx_bench_report::units::{parse_allocated_bytes, parse_duration_ns, repair_unit_glyphs};
use codeglyphx_bench_report::Catalog;

fn bench_duration_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("duration_parsing");

    group.bench_function("plain_ns", |b| {
        b.iter(|| parse_duration_ns(black_box("450 ns")))
    });
    group.bench_function("micro_with_separator", |b| {
        b.iter(|| parse_duration_ns(black_box("1,234.5 \u{3bc}s")))
    });
    group.bench_function("na_sentinel", |b| b.iter(|| parse_duration_ns(black_box("NA"))));
    group.bench_function("mismatch", |b| {
        b.iter(|| parse_duration_ns(black_box("12 parsecs")))
    });

    group.finish();
}

fn bench_allocation_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocation_parsing");

    group.bench_function("bytes", |b| {
        b.iter(|| parse_allocated_bytes(black_box("48 B")))
    });
    group.bench_function("kilobytes", |b| {
        b.iter(|| parse_allocated_bytes(black_box("1.5 KB")))
    });

    group.finish();
}

fn bench_label_normalization(c: &mut Criterion) {
    let catalog = Catalog::default();
    let mut group = c.benchmark_group("label_normalization");

    group.bench_function("known_vendor", |b| {
        b.iter(|| parse_label(black_box(&catalog), black_box("CodeGlyphX QR PNG 256")))
    });
    group.bench_function("unknown_vendor", |b| {
        b.iter(|| parse_label(black_box(&catalog), black_box("SomeLib QR PNG 256")))
    });
    group.bench_function("glyph_repair_corrupted", |b| {
        b.iter(|| repair_unit_glyphs(black_box(&catalog), black_box("1.23 \u{c2}\u{b5}s")))
    });
    group.bench_function("glyph_repair_clean", |b| {
        b.iter(|| repair_unit_glyphs(black_box(&catalog), black_box("1.23 ms")))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_duration_parsing,
    bench_allocation_parsing,
    bench_label_normalization
);
criterion_main!(benches);
