use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tabular_data::ingestion::AttachOptions;
use tabular_data::{BorrowedDataset, OwnedDataset};

fn generate_csv(rows: usize) -> String {
    let mut out = String::from("id,name,score,tags\n");
    for i in 0..rows {
        out.push_str(&format!(
            "{},\"user{}\",{}.{},\"{} {} {}\"\n",
            i,
            i,
            i % 100,
            i % 10,
            i % 7,
            i % 11,
            i % 13
        ));
    }
    out
}

fn bench_attach(c: &mut Criterion) {
    let mut group = c.benchmark_group("Attach");

    for n in [1_000, 100_000] {
        let input = generate_csv(n);
        group.throughput(Throughput::Bytes(input.len() as u64));

        group.bench_with_input(BenchmarkId::new("borrowed", n), &input, |b, input| {
            b.iter(|| {
                let ds = BorrowedDataset::attach(black_box(input), &AttachOptions::default()).unwrap();
                black_box(ds.rows());
            });
        });

        group.bench_with_input(BenchmarkId::new("owned", n), &input, |b, input| {
            b.iter(|| {
                let ds = OwnedDataset::attach(black_box(input), &AttachOptions::default()).unwrap();
                black_box(ds.rows());
            });
        });
    }
    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let input = generate_csv(10_000);
    let ds = BorrowedDataset::attach(&input, &AttachOptions::default()).unwrap();

    c.bench_function("to_csv_string_10k", |b| {
        b.iter(|| black_box(ds.to_csv_string().unwrap()));
    });
}

criterion_group!(benches, bench_attach, bench_serialize);
criterion_main!(benches);
