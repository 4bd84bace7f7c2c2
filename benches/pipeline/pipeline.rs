//! Transform pipeline benchmarks: parse, derive, facet and compose.
//!
//! Uses synthetic logs shaped like the harness output, so no fixture files
//! are needed.

use std::path::Path;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kvs_bench_charts::derive::{derive_records, DeriveConstants};
use kvs_bench_charts::facet::{facet_by_workload, DESIGN_POINTS};
use kvs_bench_charts::figure::{build_line_figure, LineLayout};
use kvs_bench_charts::loader::parse_log;
use kvs_bench_charts::schema::LogRecord;
use kvs_bench_charts::series::{LegendScope, Palette, Variant};

const ROW_COUNTS: [usize; 3] = [16, 256, 4096];

/// Rows cycle through the design points with growing buffer sizes.
fn synthetic_log(rows: usize) -> String {
    let mut text = String::from("#NumElements\tNIteration\tZipfSkewness\tUpdateRatio\t...\n");
    for i in 0..rows {
        let point = DESIGN_POINTS[i % DESIGN_POINTS.len()];
        let pages = (rows - i) * 97;
        text.push_str(&format!(
            "13421773\t10000\t{}\t{}\t{}\t{}\t1\t1000\t2000\t{}\t{}\n",
            point.zipf_skewness,
            point.update_ratio,
            i * 1024,
            pages,
            100_000 - i,
            i
        ));
    }
    text
}

fn parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline/parse");
    for rows in ROW_COUNTS {
        let text = synthetic_log(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_function(BenchmarkId::new("rows", rows), |b| {
            b.iter(|| parse_log::<LogRecord>(&text, Path::new("bench")).unwrap());
        });
    }
    group.finish();
}

fn derive_and_facet(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline/derive_facet");
    let constants = DeriveConstants::default();
    for rows in ROW_COUNTS {
        let records: Vec<LogRecord> = parse_log(&synthetic_log(rows), Path::new("bench")).unwrap();
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_function(BenchmarkId::new("rows", rows), |b| {
            b.iter(|| {
                let derived = derive_records(&records, &constants).unwrap();
                facet_by_workload(&derived, &DESIGN_POINTS)
            });
        });
    }
    group.finish();
}

fn compose_figure(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline/line_figure");
    let constants = DeriveConstants::default();
    let labels = ["dfs", "vEB", "local", "local+dfs", "local+vEB", "hint"];
    for rows in ROW_COUNTS {
        let records: Vec<LogRecord> = parse_log(&synthetic_log(rows), Path::new("bench")).unwrap();
        let derived = derive_records(&records, &constants).unwrap();
        let variants: Vec<Variant> = labels
            .iter()
            .map(|label| Variant::new(*label, derived.clone()))
            .collect();
        let scope = LegendScope::for_variants(&variants, &Palette::default()).unwrap();
        group.throughput(Throughput::Elements((rows * labels.len()) as u64));
        group.bench_function(BenchmarkId::new("rows", rows), |b| {
            b.iter(|| {
                build_line_figure(
                    &scope,
                    &variants,
                    &DESIGN_POINTS,
                    &['a', 'b', 'c', 'd'],
                    LineLayout::default(),
                    true,
                )
                .unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, parse, derive_and_facet, compose_figure);
criterion_main!(benches);
