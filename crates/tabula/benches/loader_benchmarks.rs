//! Loader performance benchmarks.
//!
//! Measures decode plus type inference across file sizes and formats, and
//! the cost of sorting a loaded table.

use std::io::Write;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tabula::{FormatRegistry, InferenceConfig, Loader, Tabula};
use tempfile::NamedTempFile;

/// Generate synthetic CSV data with the specified number of rows.
fn generate_csv_data(rows: usize) -> String {
    let mut data = String::from("id,score,hired,active,team,notes\n");

    for row in 0..rows {
        // Mix of data types, with an occasional null
        let notes = if row % 7 == 0 { "NA".to_string() } else { format!("note {}", row % 13) };
        data.push_str(&format!(
            "{},{:.2},2023-{:02}-{:02},{},Team_{},{}\n",
            row,
            row as f64 * 1.5,
            (row % 12) + 1,
            (row % 28) + 1,
            row % 2 == 0,
            row % 10,
            notes,
        ));
    }

    data
}

/// Generate the same data as JSON Lines.
fn generate_jsonl_data(rows: usize) -> String {
    let mut data = String::new();
    for row in 0..rows {
        data.push_str(&format!(
            "{{\"id\": {}, \"score\": {:.2}, \"active\": {}, \"team\": \"Team_{}\"}}\n",
            row,
            row as f64 * 1.5,
            row % 2 == 0,
            row % 10,
        ));
    }
    data
}

fn write_temp(suffix: &str, data: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(data.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Benchmark loading CSV files of various sizes.
fn bench_load_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_csv");
    let loader = Loader::new(Arc::new(FormatRegistry::new()));

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_csv_data(*rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        let file = write_temp(".csv", &data);

        group.bench_with_input(BenchmarkId::new("rows", rows), file.path(), |b, path| {
            b.iter(|| black_box(loader.load(path, None).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark loading JSON Lines files.
fn bench_load_jsonl(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_jsonl");
    let loader = Loader::new(Arc::new(FormatRegistry::new()));

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_jsonl_data(*rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        let file = write_temp(".jsonl", &data);

        group.bench_with_input(BenchmarkId::new("rows", rows), file.path(), |b, path| {
            b.iter(|| black_box(loader.load(path, None).unwrap()));
        });
    }

    group.finish();
}

/// Compare inference cost with a short and an unbounded scan.
fn bench_inference_scan_limit(c: &mut Criterion) {
    let mut group = c.benchmark_group("inference_scan_limit");
    let file = write_temp(".csv", &generate_csv_data(10_000));

    for scan_limit in [100, 1_000, usize::MAX].iter() {
        let inference = InferenceConfig {
            scan_limit: *scan_limit,
            ..InferenceConfig::default()
        };
        let loader = Loader::with_config(Arc::new(FormatRegistry::new()), inference);

        group.bench_with_input(
            BenchmarkId::new("scan_limit", scan_limit),
            file.path(),
            |b, path| {
                b.iter(|| black_box(loader.load(path, None).unwrap()));
            },
        );
    }

    group.finish();
}

/// Benchmark sorting an already loaded table.
fn bench_sort(c: &mut Criterion) {
    let tabula = Tabula::new();
    let file = write_temp(".csv", &generate_csv_data(10_000));
    let table = tabula.loader().load(file.path(), None).unwrap();

    c.bench_function("sort_10k_by_score_desc", |b| {
        b.iter(|| black_box(tabula.transformer().sort(&table, "score", true).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_load_csv,
    bench_load_jsonl,
    bench_inference_scan_limit,
    bench_sort
);
criterion_main!(benches);
