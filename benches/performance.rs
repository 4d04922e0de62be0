#![allow(missing_docs)]

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rowcode::{Rowcode, RowcodeOptions, RowcodeRecord, Timestamp, Uuid};
use std::hint::black_box;

#[derive(Clone, RowcodeRecord, Debug)]
struct WeatherTemperature {
    #[rowcode(column = 1)]
    country_id: i32,
    #[rowcode(column = 2)]
    city_id: Uuid,
    #[rowcode(column = 3)]
    time_generated: Timestamp,
    #[rowcode(column = 4)]
    temperature: f64,
}

fn generate_data(count: usize) -> Vec<WeatherTemperature> {
    (0..count)
        .map(|i| WeatherTemperature {
            country_id: (i % 300) as i32,
            city_id: Uuid::from_u128((i as u128).wrapping_mul(0x0101_0101_0101_0101_0101_0101_0101_0101)),
            time_generated: Timestamp::from_ticks(638_099_574_626_108_018 + i as i64)
                .expect("valid ticks"),
            temperature: (i as f64).sin() * 100.0,
        })
        .collect()
}

// --- BENCHMARKS ---

fn bench_writers(c: &mut Criterion) {
    let item_count = 44_000;
    let data = generate_data(item_count);
    let options = RowcodeOptions::default();
    let text = Rowcode::serialize(&data).expect("Failed to serialize");

    println!("Writers Item count: {}", item_count);

    let mut group = c.benchmark_group("Serialization Write");
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("rowcode_serialize", |b| {
        b.iter(|| Rowcode::serialize(black_box(&data)).expect("Failed to serialize"));
    });

    group.bench_function("rowcode_serialize_to_bytes", |b| {
        b.iter(|| {
            Rowcode::serialize_to_bytes(black_box(&data), &options).expect("Failed to serialize")
        });
    });

    group.finish();
}

fn bench_readers(c: &mut Criterion) {
    let item_count = 44_000;

    println!("Readers Item count: {}", item_count);

    let data = generate_data(item_count);
    let text = Rowcode::serialize(&data).expect("Failed to serialize");
    let bytes = text.clone().into_bytes();
    let parallel = RowcodeOptions::default();
    let sequential = RowcodeOptions::default().with_parallel(false);

    let mut group = c.benchmark_group("Deserialization Read");
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("rowcode_text_sequential", |b| {
        b.iter(|| {
            let _res: Vec<WeatherTemperature> =
                Rowcode::deserialize_with(black_box(&text), &sequential)
                    .expect("Failed to deserialize");
        });
    });

    group.bench_function("rowcode_text_parallel", |b| {
        b.iter(|| {
            let _res: Vec<WeatherTemperature> =
                Rowcode::deserialize_with(black_box(&text), &parallel)
                    .expect("Failed to deserialize");
        });
    });

    group.bench_function("rowcode_bytes_sequential", |b| {
        b.iter(|| {
            let _res: Vec<WeatherTemperature> =
                Rowcode::deserialize_bytes(black_box(&bytes), &sequential)
                    .expect("Failed to deserialize");
        });
    });

    group.bench_function("rowcode_bytes_parallel", |b| {
        b.iter(|| {
            let _res: Vec<WeatherTemperature> =
                Rowcode::deserialize_bytes(black_box(&bytes), &parallel)
                    .expect("Failed to deserialize");
        });
    });

    group.finish();
}

criterion_group!(benches, bench_writers, bench_readers);
criterion_main!(benches);
