//! Variable-length integer encoding (LEB128-style).
//!
//! Экономит место для маленьких чисел (длины строк, количество полей):
//! - 0-127: 1 байт
//! - 128-16383: 2 байта
//! - 16384-2097151: 3 байта
//! - до u32::MAX: 5 байт максимум

use std::io::{Read, Write};

use lazyrec_error::{CodecError, RecordResult, ResultExt};

use super::reader::Reader;

/// Максимальное кол-во байт для u32 в varint encoding (5 байт)
pub const MAX_VARINT_LEN: usize = 5;

/// Записывает u32 в varint формате.
///
/// # Формат
/// - Каждый байт: 7 бит данных + 1 бит continuation
/// - MSB=1: есть ещё байты
/// - MSB=0: последний байт
///
/// # Examples
/// ```
/// use lazyrec::codec::varint::write_varint;
///
/// let mut buf = Vec::new();
/// write_varint(&mut buf, 127).unwrap();
/// assert_eq!(buf, vec![0x7F]);
///
/// let mut buf = Vec::new();
/// write_varint(&mut buf, 128).unwrap();
/// assert_eq!(buf, vec![0x80, 0x01]);
/// ```
pub fn write_varint<W: Write>(
    w: &mut W,
    mut value: u32,
) -> RecordResult<usize> {
    let mut bytes_written = 0;

    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;

        if value != 0 {
            byte |= 0x80; // Continuation bit
        }

        w.write_all(&[byte])
            .context("Failed to write varint byte")?;
        bytes_written += 1;

        if value == 0 {
            break;
        }
    }

    Ok(bytes_written)
}

/// Читает u32 из varint формата.
///
/// # Errors
/// - `UnexpectedEof`, если буфер кончился раньше времени
/// - `VarintOverflow`, если varint длиннее 5 байт или не помещается в u32
pub(crate) fn read_varint(r: &mut Reader<'_>) -> Result<u32, CodecError> {
    let start = r.offset();
    let mut result: u32 = 0;
    let mut shift = 0;

    for i in 0..MAX_VARINT_LEN {
        let byte = r.read_u8("varint")?;

        // Пятый байт может нести только 4 старших бита u32.
        if i == MAX_VARINT_LEN - 1 && byte > 0x0F {
            return Err(CodecError::VarintOverflow { offset: start });
        }

        result |= ((byte & 0x7F) as u32) << shift;

        if byte & 0x80 == 0 {
            return Ok(result);
        }

        shift += 7;
    }

    Err(CodecError::VarintOverflow { offset: start })
}

/// Читает u32 из varint формата из потока.
///
/// Используется там, где данных заранее нет в памяти (persist-конверт).
pub fn read_varint_from<R: Read>(r: &mut R) -> RecordResult<u32> {
    let mut result: u32 = 0;
    let mut shift = 0;

    for i in 0..MAX_VARINT_LEN {
        let mut byte = [0u8; 1];
        r.read_exact(&mut byte).context("Failed to read varint byte")?;
        let byte = byte[0];

        if i == MAX_VARINT_LEN - 1 && byte > 0x0F {
            break;
        }

        result |= ((byte & 0x7F) as u32) << shift;

        if byte & 0x80 == 0 {
            return Ok(result);
        }

        shift += 7;
    }

    Err(CodecError::VarintOverflow { offset: 0 }.into())
}

/// Вычисляет размер varint для числа (без записи).
///
/// Полезно для предварительного расчёта размера буфера.
pub fn varint_size(mut value: u32) -> usize {
    if value == 0 {
        return 1;
    }

    let mut size = 0;
    while value != 0 {
        value >>= 7;
        size += 1;
    }
    size
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(buf: &[u8]) -> Result<u32, CodecError> {
        read_varint(&mut Reader::new(buf))
    }

    #[test]
    fn test_varint_size() {
        assert_eq!(varint_size(0), 1);
        assert_eq!(varint_size(127), 1);
        assert_eq!(varint_size(128), 2);
        assert_eq!(varint_size(16383), 2);
        assert_eq!(varint_size(16384), 3);
        assert_eq!(varint_size(2_097_152), 4);
        assert_eq!(varint_size(268_435_456), 5);
        assert_eq!(varint_size(u32::MAX), 5);
    }

    #[test]
    fn test_varint_roundtrip_boundaries() {
        for value in [0, 1, 127, 128, 16383, 16384, 1_000_000, u32::MAX] {
            let mut buf = Vec::new();
            let written = write_varint(&mut buf, value).unwrap();

            assert_eq!(decode(&buf).unwrap(), value, "Roundtrip failed for {value}");
            assert_eq!(written, buf.len());
            assert_eq!(written, varint_size(value), "Size mismatch for {value}");
        }
    }

    #[test]
    fn test_known_encodings() {
        // 300 => 0xAC, 0x02
        let mut buf = Vec::new();
        write_varint(&mut buf, 300).unwrap();
        assert_eq!(buf, vec![0xAC, 0x02]);

        let mut buf = Vec::new();
        write_varint(&mut buf, u32::MAX).unwrap();
        assert_eq!(buf, vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    }

    #[test]
    fn test_varint_invalid_long() {
        // 6 байт с continuation bits (невалидно)
        let bad = [0x80, 0x80, 0x80, 0x80, 0x80, 0x01];
        assert_eq!(decode(&bad), Err(CodecError::VarintOverflow { offset: 0 }));
    }

    /// Пятый байт со значащими битами сверх u32 даёт переполнение.
    #[test]
    fn test_varint_fifth_byte_overflow() {
        let bad = [0xFF, 0xFF, 0xFF, 0xFF, 0x1F];
        assert!(matches!(
            decode(&bad),
            Err(CodecError::VarintOverflow { .. })
        ));
    }

    #[test]
    fn test_multiple_incomplete_varints() {
        for case in [vec![0x80], vec![0x80, 0x80], vec![0x80, 0x80, 0x80, 0x80]] {
            let err = decode(&case).unwrap_err();
            assert!(
                matches!(err, CodecError::UnexpectedEof { .. }),
                "expected EOF-like error, got: {err}"
            );
        }
    }

    #[test]
    fn test_stream_reader_matches_slice_reader() {
        for value in [0, 300, 16384, u32::MAX] {
            let mut buf = Vec::new();
            write_varint(&mut buf, value).unwrap();
            buf.push(0xAA);

            let mut cursor = std::io::Cursor::new(buf);
            assert_eq!(read_varint_from(&mut cursor).unwrap(), value);
            assert_eq!(cursor.position() as usize, varint_size(value));
        }

        let mut truncated = std::io::Cursor::new(vec![0x80]);
        assert!(read_varint_from(&mut truncated).is_err());
    }

    #[test]
    fn test_read_leaves_extra_bytes() {
        let data = [0xAC, 0x02, 0x42];
        let mut r = Reader::new(&data);

        assert_eq!(read_varint(&mut r).unwrap(), 300);
        assert_eq!(r.read_u8("next").unwrap(), 0x42);
    }
}
