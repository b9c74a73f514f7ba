//! Сериализация карты полей в бинарный формат.
//!
//! Формат записи:
//!
//! ```text
//! varint(field_count)
//! повторяется field_count раз:
//!     varint(name_len) name_bytes value
//! ```
//!
//! Значение состоит из однобайтового тега и тела. Числа фиксированной ширины пишутся
//! в big-endian, длины в varint.

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use lazyrec_error::{CodecError, RecordResult, ResultExt};

use super::{
    compress_block, should_compress, varint::write_varint, CodecConfig, TAG_BOOL,
    TAG_COMPRESSED, TAG_DOUBLE, TAG_FLOAT, TAG_INT, TAG_LIST, TAG_LONG, TAG_MAP, TAG_NULL,
    TAG_STR,
};
use crate::value::{FieldMap, Value};

/// Записывает все поля карты.
pub fn write_fields<W: Write>(
    w: &mut W,
    fields: &FieldMap,
    config: &CodecConfig,
) -> RecordResult<()> {
    if fields.len() > config.max_fields {
        return Err(CodecError::SizeLimit {
            what: "field count".to_string(),
            size: fields.len() as u64,
            limit: config.max_fields as u64,
        }
        .into());
    }

    write_varint(w, len_u32(fields.len(), "field count")?)?;
    for (name, value) in fields {
        write_bytes(w, name.as_bytes(), "field name")?;
        write_value(w, value, config, 0).with_context(|| format!("field '{name}'"))?;
    }
    Ok(())
}

/// Записывает одно значение.
///
/// `depth`: количество контейнеров, внутри которых находится значение.
pub fn write_value<W: Write>(
    w: &mut W,
    v: &Value,
    config: &CodecConfig,
    depth: usize,
) -> RecordResult<()> {
    match v {
        Value::Null => w.write_u8(TAG_NULL)?,
        Value::Bool(b) => {
            w.write_u8(TAG_BOOL)?;
            w.write_u8(u8::from(*b))?;
        }
        Value::Int(i) => {
            w.write_u8(TAG_INT)?;
            w.write_i32::<BigEndian>(*i)?;
        }
        Value::Long(i) => {
            w.write_u8(TAG_LONG)?;
            w.write_i64::<BigEndian>(*i)?;
        }
        Value::Float(f) => {
            w.write_u8(TAG_FLOAT)?;
            w.write_f32::<BigEndian>(f.into_inner())?;
        }
        Value::Double(f) => {
            w.write_u8(TAG_DOUBLE)?;
            w.write_f64::<BigEndian>(f.into_inner())?;
        }
        Value::Str(s) => {
            if should_compress(s.len(), config.compression_threshold) {
                // Тело сжатого блока это обычное закодированное значение.
                let mut inner = Vec::with_capacity(s.len() + 6);
                inner.write_u8(TAG_STR)?;
                write_bytes(&mut inner, s.as_bytes(), "string")?;
                let compressed = compress_block(&inner)?;

                w.write_u8(TAG_COMPRESSED)?;
                write_bytes(w, &compressed, "compressed block")?;
            } else {
                w.write_u8(TAG_STR)?;
                write_bytes(w, s.as_bytes(), "string")?;
            }
        }
        Value::List(items) => {
            check_depth(depth + 1, config)?;
            w.write_u8(TAG_LIST)?;
            write_varint(w, len_u32(items.len(), "list")?)?;
            for item in items {
                write_value(w, item, config, depth + 1)?;
            }
        }
        Value::Map(map) => {
            check_depth(depth + 1, config)?;
            w.write_u8(TAG_MAP)?;
            write_varint(w, len_u32(map.len(), "map")?)?;
            for (key, item) in map {
                write_bytes(w, key.as_bytes(), "map key")?;
                write_value(w, item, config, depth + 1)?;
            }
        }
    }
    Ok(())
}

/// Записывает varint-длину и сами байты.
fn write_bytes<W: Write>(
    w: &mut W,
    bytes: &[u8],
    what: &str,
) -> RecordResult<()> {
    write_varint(w, len_u32(bytes.len(), what)?)?;
    w.write_all(bytes)?;
    Ok(())
}

fn len_u32(
    len: usize,
    what: &str,
) -> Result<u32, CodecError> {
    u32::try_from(len).map_err(|_| CodecError::Encoding {
        what: what.to_string(),
        reason: format!("length {len} does not fit in u32"),
    })
}

fn check_depth(
    depth: usize,
    config: &CodecConfig,
) -> Result<(), CodecError> {
    if depth > config.max_depth {
        return Err(CodecError::DepthLimit {
            depth,
            max: config.max_depth,
            offset: None,
        });
    }
    Ok(())
}
