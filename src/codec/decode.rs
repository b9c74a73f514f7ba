//! Разбор бинарного формата записи в карту полей.
//!
//! Декодер строгий: буфер должен содержать ровно одну запись, без
//! повторяющихся имён полей и без лишних байтов в конце. Все
//! последовательности запрашиваются у [`ContainerNormalizer`].

use lazyrec_error::CodecError;

use super::{
    decompress_block,
    reader::Reader,
    varint::read_varint,
    CodecConfig, ContainerNormalizer, TAG_BOOL, TAG_COMPRESSED, TAG_DOUBLE, TAG_FLOAT,
    TAG_INT, TAG_LIST, TAG_LONG, TAG_MAP, TAG_NULL, TAG_STR,
};
use crate::value::{FieldMap, Value};

/// Разбирает буфер целиком.
///
/// `reuse`: карта прошлого декодирования. Её списки предлагаются
/// нормализатору для полей с тем же именем; сами значения не
/// переиспользуются.
pub fn read_fields(
    buf: &[u8],
    reuse: Option<FieldMap>,
    containers: &mut dyn ContainerNormalizer,
    config: &CodecConfig,
) -> Result<FieldMap, CodecError> {
    let mut r = Reader::new(buf);
    let mut reuse = reuse.unwrap_or_default();

    let count = read_len(&mut r, "field count", config.max_fields)?;
    let mut fields = FieldMap::with_capacity(count);

    for _ in 0..count {
        let name_offset = r.offset();
        let name = read_string(&mut r, "field name")?;
        if fields.contains_key(&name) {
            return Err(CodecError::DuplicateField {
                name,
                offset: name_offset,
            });
        }

        let recycled = match reuse.remove(&name) {
            Some(Value::List(old)) => Some(old),
            _ => None,
        };
        let value = read_value(&mut r, containers, config, 0, false, recycled)?;
        fields.insert(name, value);
    }

    if r.remaining() > 0 {
        return Err(CodecError::TrailingBytes {
            remaining: r.remaining(),
            offset: r.offset(),
        });
    }

    Ok(fields)
}

/// Читает одно значение.
///
/// `depth`: количество контейнеров, внутри которых находится значение.
/// `in_compressed`: значение лежит внутри сжатого блока (на любой глубине).
fn read_value(
    r: &mut Reader<'_>,
    containers: &mut dyn ContainerNormalizer,
    config: &CodecConfig,
    depth: usize,
    in_compressed: bool,
    recycled: Option<Vec<Value>>,
) -> Result<Value, CodecError> {
    let tag_offset = r.offset();
    let tag = r.read_u8("value tag")?;

    match tag {
        TAG_NULL => Ok(Value::Null),
        TAG_BOOL => match r.read_u8("bool body")? {
            0 => Ok(Value::Bool(false)),
            1 => Ok(Value::Bool(true)),
            other => Err(CodecError::InvalidTag {
                tag: other,
                offset: r.offset() - 1,
            }),
        },
        TAG_INT => Ok(Value::Int(r.read_i32("int body")?)),
        TAG_LONG => Ok(Value::Long(r.read_i64("long body")?)),
        TAG_FLOAT => Ok(Value::float(r.read_f32("float body")?)),
        TAG_DOUBLE => Ok(Value::double(r.read_f64("double body")?)),
        TAG_STR => Ok(Value::Str(read_string(r, "string")?)),
        TAG_LIST => {
            check_depth(depth + 1, config, tag_offset)?;
            let len = read_container_len(r, "list length")?;
            let mut items = containers.sequence(len, recycled);
            for _ in 0..len {
                items.push(read_value(
                    r,
                    containers,
                    config,
                    depth + 1,
                    in_compressed,
                    None,
                )?);
            }
            Ok(Value::List(items))
        }
        TAG_MAP => {
            check_depth(depth + 1, config, tag_offset)?;
            let len = read_container_len(r, "map length")?;
            let mut map = FieldMap::with_capacity(len);
            for _ in 0..len {
                let key_offset = r.offset();
                let key = read_string(r, "map key")?;
                if map.contains_key(&key) {
                    return Err(CodecError::DuplicateField {
                        name: key,
                        offset: key_offset,
                    });
                }
                let item = read_value(r, containers, config, depth + 1, in_compressed, None)?;
                map.insert(key, item);
            }
            Ok(Value::Map(map))
        }
        TAG_COMPRESSED if in_compressed => Err(CodecError::InvalidTag {
            tag: TAG_COMPRESSED,
            offset: tag_offset,
        }),
        TAG_COMPRESSED => read_compressed(r, containers, config, depth, recycled),
        other => Err(CodecError::InvalidTag {
            tag: other,
            offset: tag_offset,
        }),
    }
}

/// Сжатый блок содержит ровно одно значение; сжатие внутри него запрещено
/// на любой глубине. Смещения ошибок внутри блока отсчитываются от начала
/// распакованных данных.
fn read_compressed(
    r: &mut Reader<'_>,
    containers: &mut dyn ContainerNormalizer,
    config: &CodecConfig,
    depth: usize,
    recycled: Option<Vec<Value>>,
) -> Result<Value, CodecError> {
    let len = read_varint(r)? as usize;
    let block = r.read_exact(len, "compressed block")?;
    let inner = decompress_block(block, config.max_decompressed_len)?;

    let mut inner_reader = Reader::new(&inner);
    let value = read_value(&mut inner_reader, containers, config, depth, true, recycled)?;

    if inner_reader.remaining() > 0 {
        return Err(CodecError::TrailingBytes {
            remaining: inner_reader.remaining(),
            offset: inner_reader.offset(),
        });
    }
    Ok(value)
}

fn read_string(
    r: &mut Reader<'_>,
    context: &str,
) -> Result<String, CodecError> {
    let len = read_varint(r)? as usize;
    let start = r.offset();
    let bytes = r.read_exact(len, context)?;
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| CodecError::InvalidUtf8 {
            offset: start + e.valid_up_to(),
        })
}

/// Читает varint-длину и проверяет её против `limit`.
fn read_len(
    r: &mut Reader<'_>,
    what: &str,
    limit: usize,
) -> Result<usize, CodecError> {
    let len = read_varint(r)? as usize;
    if len > limit {
        return Err(CodecError::SizeLimit {
            what: what.to_string(),
            size: len as u64,
            limit: limit as u64,
        });
    }
    Ok(len)
}

/// Длина контейнера не может превышать остаток буфера: каждый элемент
/// занимает минимум один байт. Иначе декодер выделил бы память под
/// мусорную длину.
fn read_container_len(
    r: &mut Reader<'_>,
    what: &str,
) -> Result<usize, CodecError> {
    let len = read_varint(r)? as usize;
    let remaining = r.remaining();
    if len > remaining {
        return Err(CodecError::SizeLimit {
            what: what.to_string(),
            size: len as u64,
            limit: remaining as u64,
        });
    }
    Ok(len)
}

fn check_depth(
    depth: usize,
    config: &CodecConfig,
    offset: usize,
) -> Result<(), CodecError> {
    if depth > config.max_depth {
        return Err(CodecError::DepthLimit {
            depth,
            max: config.max_depth,
            offset: Some(offset),
        });
    }
    Ok(())
}
