use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use tabular_data::OwnedDataset;
use tabular_data::ingestion::AttachOptions;
use tabular_data::processing::{profile, stats};

fn setup_dataset(n: usize) -> OwnedDataset {
    let mut input = String::from("count,ratio\n");
    for i in 0..n {
        if i % 17 == 0 {
            input.push_str(",\n");
        } else {
            input.push_str(&format!("{},{}.{}\n", i % 1000, i % 50, i % 9));
        }
    }
    OwnedDataset::attach(&input, &AttachOptions::default()).unwrap()
}

fn bench_column_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("Column_Statistics");

    for n in [10_000, 100_000] {
        let ds = setup_dataset(n);
        group.bench_with_input(BenchmarkId::new("mean_median_mode", n), &ds, |b, ds| {
            let col = ds.column(0).unwrap();
            b.iter(|| {
                black_box(col.mean().unwrap());
                black_box(col.median().unwrap());
                black_box(col.mode().unwrap());
            });
        });

        group.bench_with_input(BenchmarkId::new("standard_deviation", n), &ds, |b, ds| {
            let col = ds.column(1).unwrap();
            b.iter(|| black_box(col.standard_deviation().unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("profile", n), &ds, |b, ds| {
            b.iter(|| black_box(profile(ds)));
        });
    }
    group.finish();
}

fn bench_median_selection(c: &mut Criterion) {
    let data: Vec<f64> = (0..100_000).map(|i| ((i * 7919) % 100_003) as f64).collect();
    c.bench_function("median_100k", |b| {
        b.iter_with_setup(|| data.clone(), |v| black_box(stats::median(v).unwrap()));
    });
}

criterion_group!(benches, bench_column_statistics, bench_median_selection);
criterion_main!(benches);
