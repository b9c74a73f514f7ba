//! Сквозные сценарии использования записи: сборка, передача в байтах,
//! чтение на стороне получателя.

use std::{io::Cursor, thread};

use lazyrec::{
    read_record, write_record, FieldMap, LazyRecord, RecordFacade, RecordKind, SharedCodec,
    StatusCode, TypeTag, TypedRecord, TypedValue, UntypedRecord, Value, ZdbCodec,
};
use rstest::{fixture, rstest};

#[fixture]
fn codec() -> SharedCodec {
    ZdbCodec::new().shared()
}

fn nested_rows() -> Value {
    let row = |id: i64, name: &str| {
        let map: FieldMap = [("id", Value::Long(id)), ("name", Value::from(name))]
            .into_iter()
            .collect();
        Value::Map(map)
    };
    Value::List(vec![row(1, "alpha"), row(2, "beta"), Value::Null])
}

/// Сборка, кодирование и чтение на стороне получателя.
#[rstest]
fn scenario_build_encode_decode(codec: SharedCodec) {
    let mut sender = UntypedRecord::empty(codec.clone());
    sender.set("1", "bar").unwrap();
    sender.set("2", 42i64).unwrap();
    let bytes = sender.to_bytes().unwrap();

    let mut receiver = UntypedRecord::from_bytes(codec, bytes);
    assert!(!receiver.is_materialized());
    assert_eq!(receiver.get("2"), Some(&Value::Long(42)));
    assert_eq!(receiver.get("1"), Some(&Value::from("bar")));
    assert!(receiver.is_materialized());
}

/// Неразборчивый буфер: строгие чтения падают, мягкие возвращают `None`.
#[rstest]
fn scenario_corrupted_buffer(codec: SharedCodec) {
    let mut record = LazyRecord::from_bytes(codec, &b"foo"[..]);

    let err = record.has("x").unwrap_err();
    assert_eq!(err.status_code(), StatusCode::DataUnavailable);
    assert_eq!(record.get("x"), None);
    assert!(record.field_count().is_err());
    assert!(record.remove("x").is_err());
    assert_eq!(record.iter().count(), 0);
}

/// Вложенный контейнер принадлежит вызывающему: его изменение не
/// затрагивает запись.
#[rstest]
fn scenario_nested_containers_are_owned(codec: SharedCodec) {
    let mut sender = LazyRecord::empty(codec.clone());
    sender.set("rows", nested_rows()).unwrap();
    let bytes = sender.to_bytes().unwrap();

    let mut receiver = LazyRecord::from_bytes(codec, bytes);
    let mut rows = receiver.get("rows").cloned().unwrap();
    assert_eq!(rows, nested_rows());

    let list = rows.as_list_mut().unwrap();
    list.pop();
    list[0].as_map_mut().unwrap().insert("id", Value::Long(100));

    assert_eq!(receiver.get("rows"), Some(&nested_rows()));
    assert_ne!(rows, nested_rows());
}

/// Теги переживают `copy`, но не передачу в байтах.
#[rstest]
fn scenario_typed_tags_across_copy_and_transport(codec: SharedCodec) {
    let mut record = TypedRecord::empty(codec.clone());
    record.set("a", 5i32, TypeTag::Int).unwrap();

    let mut copy = record.copy().unwrap();
    assert_eq!(
        copy.get("a"),
        Some(TypedValue::new(TypeTag::Int, Value::Int(5)))
    );

    let mut transported = TypedRecord::from_bytes(codec, copy.to_bytes().unwrap());
    assert_eq!(
        transported.get("a"),
        Some(TypedValue::new(TypeTag::Unknown, Value::Int(5)))
    );
    assert_eq!(transported.tag("a"), None);
}

/// Запись, сохранённая в файл, восстанавливается нематериализованной.
#[rstest]
fn scenario_persist_to_file(codec: SharedCodec) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("record.lzr");

    let mut record = LazyRecord::empty(codec.clone());
    record.set("rows", nested_rows()).unwrap();
    record.set("total", 2i64).unwrap();
    write_record(&mut std::fs::File::create(&path).unwrap(), &record).unwrap();

    let mut file = std::fs::File::open(&path).unwrap();
    let mut restored = read_record(&mut file, codec).unwrap();
    assert!(!restored.is_materialized());
    assert_eq!(restored, record);
    assert_eq!(restored.get("total"), Some(&Value::Long(2)));
}

/// Копия передаётся в другой поток, оригинал остаётся у владельца.
#[rstest]
fn scenario_copy_handed_to_worker(codec: SharedCodec) {
    let mut record = LazyRecord::empty(codec);
    record.set("n", 1i64).unwrap();

    let copy = record.copy().unwrap();
    let worker = thread::spawn(move || {
        let mut copy = copy;
        copy.set("n", 2i64).unwrap();
        copy
    });
    let mut returned = worker.join().unwrap();

    assert_eq!(record.get("n"), Some(&Value::Long(1)));
    assert_eq!(returned.get("n"), Some(&Value::Long(2)));
    assert_ne!(record, returned);
}

/// Реестр выбирает фасад по имени из настроек.
#[rstest]
#[case("untyped", RecordKind::Untyped)]
#[case("plain", RecordKind::Untyped)]
#[case("TAGGED", RecordKind::Typed)]
fn scenario_facade_from_registry(
    codec: SharedCodec,
    #[case] name: &str,
    #[case] expected: RecordKind,
) {
    let kind: RecordKind = name.parse().unwrap();
    assert_eq!(kind, expected);

    let mut sender = kind.create_empty(codec.clone());
    sender.record_mut().set("k", "v").unwrap();
    let bytes = sender.to_bytes().unwrap();

    let mut receiver = kind.create_from_bytes(codec, bytes);
    assert_eq!(receiver.kind(), expected);
    assert_eq!(receiver.get_value("k"), Some(&Value::from("v")));
}

/// Пишущая операция на неразборчивом буфере не видна чтениям.
#[rstest]
fn scenario_set_on_corrupted_buffer(codec: SharedCodec) {
    let mut record = LazyRecord::from_bytes(codec, &b"foo"[..]);

    record.set("x", 1i64).unwrap();
    assert_eq!(record.get("x"), None);
    assert!(record.has("x").is_err());

    let twin = LazyRecord::from_bytes(record.codec().clone(), &b"foo"[..]);
    assert_eq!(record, twin);
}

/// `Cursor` над сохранённым потоком из нескольких записей.
#[rstest]
fn scenario_stream_of_records(codec: SharedCodec) {
    let mut stream = Vec::new();
    for i in 0..5i64 {
        let mut record = LazyRecord::empty(codec.clone());
        record.set("i", i).unwrap();
        write_record(&mut stream, &record).unwrap();
    }

    let mut cursor = Cursor::new(stream);
    for i in 0..5i64 {
        let mut record = read_record(&mut cursor, codec.clone()).unwrap();
        assert_eq!(record.get("i"), Some(&Value::Long(i)));
    }
    assert!(read_record(&mut cursor, codec).is_err());
}
