//! Сохранение записи целиком: конверт вокруг полезной нагрузки.
//!
//! Формат конверта:
//!
//! ```text
//! "LZR" | version: u8 | varint(payload_len) | payload | crc32: u32 (BE)
//! ```
//!
//! CRC считается по всем байтам до него. При сохранении материализованная
//! запись кодируется (её карта полей остаётся на месте); при восстановлении
//! загружается только буфер, и запись начинает жизнь нематериализованной.

use std::{
    fmt,
    io::{Read, Write},
};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use crc32fast::Hasher;
use lazyrec_error::{ensure, CodecError, RecordError, RecordResult, ResultExt};
use serde::{
    de::{self, DeserializeSeed, SeqAccess, Visitor},
    ser, Deserializer, Serialize, Serializer,
};
use tracing::trace;

use super::LazyRecord;
use crate::codec::{
    varint::{read_varint_from, varint_size, write_varint},
    SharedCodec,
};

/// Magic конверта.
pub const RECORD_MAGIC: &[u8; 3] = b"LZR";

/// Текущая версия конверта.
pub const ENVELOPE_VERSION: u8 = 1;

/// Версии, которые умеет читать `read_record`.
pub const SUPPORTED_VERSIONS: &[u8] = &[1];

/// Верхняя граница полезной нагрузки конверта.
pub const MAX_PAYLOAD_LEN: usize = 256 * 1024 * 1024;

/// Записывает запись в конверте.
pub fn write_record<W: Write>(
    w: &mut W,
    record: &LazyRecord,
) -> RecordResult<()> {
    let payload = record.to_bytes().context("encoding record payload")?;
    ensure!(
        payload.len() <= MAX_PAYLOAD_LEN,
        CodecError::SizeLimit {
            what: "record payload".to_string(),
            size: payload.len() as u64,
            limit: MAX_PAYLOAD_LEN as u64,
        }
    );

    let mut head = Vec::with_capacity(RECORD_MAGIC.len() + 1 + varint_size(payload.len() as u32));
    head.extend_from_slice(RECORD_MAGIC);
    head.write_u8(ENVELOPE_VERSION)?;
    write_varint(&mut head, payload.len() as u32)?;

    let mut hasher = Hasher::new();
    hasher.update(&head);
    hasher.update(&payload);
    let crc = hasher.finalize();

    w.write_all(&head)?;
    w.write_all(&payload)?;
    w.write_u32::<BigEndian>(crc)?;

    trace!(payload = payload.len(), crc, "Record written");
    Ok(())
}

/// Читает запись из конверта, не декодируя полезную нагрузку.
pub fn read_record<R: Read>(
    r: &mut R,
    codec: SharedCodec,
) -> RecordResult<LazyRecord> {
    let mut hasher = Hasher::new();

    let mut magic = [0u8; 3];
    r.read_exact(&mut magic).context("reading record magic")?;
    ensure!(
        &magic == RECORD_MAGIC,
        RecordError::InvalidMagic {
            expected: *RECORD_MAGIC,
            got: magic,
        }
    );
    hasher.update(&magic);

    let version = r.read_u8().context("reading envelope version")?;
    ensure!(
        SUPPORTED_VERSIONS.contains(&version),
        RecordError::UnsupportedVersion {
            found: version,
            supported: SUPPORTED_VERSIONS.to_vec(),
        }
    );
    hasher.update(&[version]);

    let len = read_varint_from(r).context("reading payload length")?;
    let len = len as usize;
    ensure!(
        len <= MAX_PAYLOAD_LEN,
        CodecError::SizeLimit {
            what: "record payload".to_string(),
            size: len as u64,
            limit: MAX_PAYLOAD_LEN as u64,
        }
    );
    let mut len_buf = Vec::with_capacity(varint_size(len as u32));
    write_varint(&mut len_buf, len as u32)?;
    hasher.update(&len_buf);

    let mut payload = vec![0u8; len];
    r.read_exact(&mut payload).context("reading record payload")?;
    hasher.update(&payload);

    let recorded = r.read_u32::<BigEndian>().context("reading record checksum")?;
    let computed = hasher.finalize();
    ensure!(
        computed == recorded,
        RecordError::ChecksumMismatch { computed, recorded }
    );

    trace!(payload = len, "Record read");
    Ok(LazyRecord::from_bytes(codec, payload))
}

////////////////////////////////////////////////////////////////////////////////
// Serde
////////////////////////////////////////////////////////////////////////////////

/// Запись сериализуется как байты своей полезной нагрузки.
impl Serialize for LazyRecord {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let payload = self
            .to_bytes()
            .map_err(|e| <S::Error as ser::Error>::custom(e))?;
        serializer.serialize_bytes(&payload)
    }
}

/// Восстанавливает [`LazyRecord`] из байтов полезной нагрузки.
///
/// Записи нужен кодек, поэтому десериализация идёт через seed.
#[derive(Debug, Clone)]
pub struct RecordSeed {
    codec: SharedCodec,
}

impl RecordSeed {
    pub fn new(codec: SharedCodec) -> Self {
        Self { codec }
    }
}

impl<'de> DeserializeSeed<'de> for RecordSeed {
    type Value = LazyRecord;

    fn deserialize<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Self::Value, D::Error> {
        let payload = deserializer.deserialize_byte_buf(PayloadVisitor)?;
        Ok(LazyRecord::from_bytes(self.codec, payload))
    }
}

struct PayloadVisitor;

impl<'de> Visitor<'de> for PayloadVisitor {
    type Value = Vec<u8>;

    fn expecting(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.write_str("record payload bytes")
    }

    fn visit_bytes<E: de::Error>(
        self,
        v: &[u8],
    ) -> Result<Self::Value, E> {
        Ok(v.to_vec())
    }

    fn visit_byte_buf<E: de::Error>(
        self,
        v: Vec<u8>,
    ) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_seq<A: SeqAccess<'de>>(
        self,
        mut seq: A,
    ) -> Result<Self::Value, A::Error> {
        let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(byte) = seq.next_element::<u8>()? {
            out.push(byte);
        }
        Ok(out)
    }
}
