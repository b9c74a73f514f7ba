//! Сравнение ленивой передачи записи с немедленным декодированием.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lazyrec::{BinaryCodec, FieldMap, LazyRecord, SharedCodec, Value, ZdbCodec};
use rand::{rngs::SmallRng, Rng, SeedableRng};

const FIELD_COUNTS: &[usize] = &[4, 32, 256];

fn make_fields(
    n: usize,
    rng: &mut SmallRng,
) -> FieldMap {
    (0..n)
        .map(|i| {
            let value = match i % 4 {
                0 => Value::Long(rng.gen()),
                1 => Value::double(rng.gen()),
                2 => Value::Str(format!("value-{}", rng.gen::<u32>())),
                _ => Value::List((0..8).map(Value::Int).collect()),
            };
            (format!("field_{i}"), value)
        })
        .collect()
}

fn encoded(
    codec: &SharedCodec,
    n: usize,
) -> Vec<u8> {
    let mut rng = SmallRng::seed_from_u64(42);
    codec.encode(&make_fields(n, &mut rng)).unwrap()
}

/// Запись, которую только пересылают дальше: ленивая не декодирует вовсе.
fn bench_pass_through(c: &mut Criterion) {
    let codec = ZdbCodec::new().shared();
    let mut group = c.benchmark_group("pass_through");

    for &n in FIELD_COUNTS {
        let bytes = encoded(&codec, n);

        group.bench_with_input(BenchmarkId::new("lazy", n), &bytes, |b, bytes| {
            b.iter(|| {
                let record = LazyRecord::from_bytes(codec.clone(), bytes.clone());
                black_box(record.to_bytes().unwrap())
            })
        });

        group.bench_with_input(BenchmarkId::new("eager", n), &bytes, |b, bytes| {
            b.iter(|| {
                let fields = codec.decode(black_box(bytes)).unwrap();
                let record = LazyRecord::from_fields(codec.clone(), fields);
                black_box(record.to_bytes().unwrap())
            })
        });
    }
    group.finish();
}

/// Чтение одного поля: первая операция платит за декодирование.
fn bench_first_read(c: &mut Criterion) {
    let codec = ZdbCodec::new().shared();
    let mut group = c.benchmark_group("first_read");

    for &n in FIELD_COUNTS {
        let bytes = encoded(&codec, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &bytes, |b, bytes| {
            b.iter(|| {
                let mut record = LazyRecord::from_bytes(codec.clone(), bytes.clone());
                black_box(record.get("field_0").cloned())
            })
        });
    }
    group.finish();
}

/// Стоимость `copy` в обоих состояниях.
fn bench_copy(c: &mut Criterion) {
    let codec = ZdbCodec::new().shared();
    let mut group = c.benchmark_group("copy");

    for &n in FIELD_COUNTS {
        let bytes = encoded(&codec, n);
        let raw = LazyRecord::from_bytes(codec.clone(), bytes.clone());
        let mut materialized = LazyRecord::from_bytes(codec.clone(), bytes);
        materialized.materialize();

        group.bench_function(BenchmarkId::new("raw", n), |b| {
            b.iter(|| black_box(raw.copy().unwrap()))
        });
        group.bench_function(BenchmarkId::new("materialized", n), |b| {
            b.iter(|| black_box(materialized.copy().unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pass_through, bench_first_read, bench_copy);
criterion_main!(benches);
