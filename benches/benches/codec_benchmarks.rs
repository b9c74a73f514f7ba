use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lazyrec::{
    BinaryCodec, CodecConfig, FieldMap, FreshContainers, RecyclingContainers, Value, ZdbCodec,
};

fn wide_record(n: usize) -> FieldMap {
    (0..n)
        .map(|i| {
            let row: FieldMap = [("id", Value::Long(i as i64)), ("tag", Value::from("x"))]
                .into_iter()
                .collect();
            (
                format!("f{i}"),
                Value::List(vec![Value::Map(row), Value::Int(i as i32)]),
            )
        })
        .collect()
}

fn bench_encode_decode(c: &mut Criterion) {
    let codec = ZdbCodec::new();
    let mut group = c.benchmark_group("codec");

    for n in [16usize, 256] {
        let fields = wide_record(n);
        let bytes = codec.encode(&fields).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", n), &fields, |b, fields| {
            b.iter(|| codec.encode(black_box(fields)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode_fresh", n), &bytes, |b, bytes| {
            b.iter(|| {
                codec
                    .decode_with(black_box(bytes), None, &mut FreshContainers)
                    .unwrap()
            })
        });
        group.bench_with_input(BenchmarkId::new("decode_recycled", n), &bytes, |b, bytes| {
            let mut previous = Some(codec.decode(bytes).unwrap());
            let mut containers = RecyclingContainers::new();
            b.iter(|| {
                let fields = codec
                    .decode_with(black_box(bytes), previous.take(), &mut containers)
                    .unwrap();
                previous = Some(fields);
            })
        });
    }
    group.finish();
}

fn bench_compression(c: &mut Criterion) {
    let plain = ZdbCodec::new();
    let compressing = ZdbCodec::with_config(CodecConfig {
        compression_threshold: Some(256),
        ..Default::default()
    })
    .unwrap();

    let fields: FieldMap = [("body", Value::Str("lorem ipsum ".repeat(512)))]
        .into_iter()
        .collect();

    let mut group = c.benchmark_group("compression");
    group.bench_function("encode_plain", |b| {
        b.iter(|| plain.encode(black_box(&fields)).unwrap())
    });
    group.bench_function("encode_zstd", |b| {
        b.iter(|| compressing.encode(black_box(&fields)).unwrap())
    });

    let bytes = compressing.encode(&fields).unwrap();
    group.bench_function("decode_zstd", |b| {
        b.iter(|| compressing.decode(black_box(&bytes)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_encode_decode, bench_compression);
criterion_main!(benches);
