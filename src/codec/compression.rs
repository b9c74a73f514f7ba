//! Сжатие и распаковка блоков данных с помощью ZSTD.
//!
//! Кодек сжимает только строковые значения, длина которых не меньше
//! порога из [`CodecConfig`](super::CodecConfig).

use std::io::Read;

use lazyrec_error::{CodecError, CompressionOp};
use zstd::stream::{encode_all, Decoder};

/// Уровень сжатия 3: баланс между скоростью и размером.
const COMPRESSION_LEVEL: i32 = 3;

/// Проверяет, нужно ли сжимать блок данных заданного размера.
pub fn should_compress(
    size: usize,
    threshold: Option<usize>,
) -> bool {
    matches!(threshold, Some(t) if size >= t)
}

/// Сжимает переданный срез байтов.
pub fn compress_block(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    encode_all(data, COMPRESSION_LEVEL).map_err(|e| CodecError::Compression {
        operation: CompressionOp::Compress,
        reason: e.to_string(),
    })
}

/// Распаковывает блок, сжатый [`compress_block`].
///
/// Результат не длиннее `limit` байт: больший блок даёт
/// `CodecError::SizeLimit`, не дочитываясь до конца.
pub fn decompress_block(
    data: &[u8],
    limit: usize,
) -> Result<Vec<u8>, CodecError> {
    let decoder = Decoder::new(data).map_err(decompress_error)?;

    let mut out = Vec::new();
    decoder
        .take(limit as u64 + 1)
        .read_to_end(&mut out)
        .map_err(decompress_error)?;

    if out.len() > limit {
        return Err(CodecError::SizeLimit {
            what: "decompressed block".to_string(),
            size: out.len() as u64,
            limit: limit as u64,
        });
    }
    Ok(out)
}

fn decompress_error(e: std::io::Error) -> CodecError {
    CodecError::Compression {
        operation: CompressionOp::Decompress,
        reason: e.to_string(),
    }
}
