#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use lazyrec::{CodecConfig, LazyRecord, ZdbCodec};

#[derive(Debug, Arbitrary)]
enum Op {
    Get(String),
    Has(String),
    Count,
    Set(String, i64),
    Remove(String),
    Iterate,
    Copy,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    data: Vec<u8>,
    shallow: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: FuzzInput| {
    let config = CodecConfig {
        max_depth: if input.shallow { 2 } else { 64 },
        ..Default::default()
    };
    let Ok(codec) = ZdbCodec::with_config(config) else {
        return;
    };

    // Никакой буфер и никакая последовательность операций не должны
    // приводить к панике.
    let mut record = LazyRecord::from_bytes(codec.shared(), input.data);
    let readable = match record.copy() {
        Ok(mut probe) => probe.materialize(),
        Err(_) => return,
    };

    for op in input.ops.into_iter().take(64) {
        match op {
            Op::Get(name) => {
                let _ = record.get(&name);
            }
            Op::Has(name) => {
                assert_eq!(record.has(&name).is_ok(), readable);
            }
            Op::Count => {
                assert_eq!(record.field_count().is_ok(), readable);
            }
            Op::Set(name, v) => {
                let _ = record.set(name, v);
            }
            Op::Remove(name) => {
                let _ = record.remove(&name);
            }
            Op::Iterate => {
                let _ = record.iter().count();
            }
            Op::Copy => {
                let copy = record.copy().expect("copy of any record succeeds");
                assert_eq!(copy, record);
                assert_eq!(copy.content_hash(), record.content_hash());
            }
        }
    }
});
