//! Бинарный кодек записей.
//!
//! Запись хранится как последовательность именованных полей, каждое
//! значение несёт однобайтовый тег (см. [`tags`]). Кодек не знает ничего о
//! ленивости: [`LazyRecord`](crate::record::LazyRecord) обращается к нему
//! только через трейт [`BinaryCodec`].

pub mod compression;
pub mod decode;
pub mod encode;
pub mod normalizer;
mod reader;
pub mod tags;
pub mod varint;
pub mod zdb_codec;

use std::{fmt, sync::Arc};

pub use compression::*;
pub use decode::*;
pub use encode::*;
use lazyrec_error::{ensure, RecordResult, StatusCode};
pub use normalizer::*;
use serde::{Deserialize, Serialize};
pub use tags::*;
pub use zdb_codec::*;

use crate::value::FieldMap;

/// Общий указатель на кодек: одна реализация разделяется всеми записями и
/// их копиями.
pub type SharedCodec = Arc<dyn BinaryCodec>;

/// Граница между записью и её бинарным представлением.
///
/// Реализация обязана быть детерминированной: одна и та же карта полей
/// всегда кодируется в одни и те же байты, а `decode(encode(m))` даёт
/// карту, равную `m`.
pub trait BinaryCodec: Send + Sync + fmt::Debug {
    /// Кодирует карту полей.
    fn encode(
        &self,
        fields: &FieldMap,
    ) -> RecordResult<Vec<u8>>;

    /// Декодирует буфер.
    ///
    /// `reuse`: карта прошлого декодирования, чьи контейнеры можно
    /// предложить `containers`. Возвращаемая карта всегда новая.
    fn decode_with(
        &self,
        bytes: &[u8],
        reuse: Option<FieldMap>,
        containers: &mut dyn ContainerNormalizer,
    ) -> RecordResult<FieldMap>;

    /// Декодирует буфер в полностью независимую карту.
    fn decode(
        &self,
        bytes: &[u8],
    ) -> RecordResult<FieldMap> {
        self.decode_with(bytes, None, &mut FreshContainers)
    }
}

/// Параметры кодека.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Максимальная вложенность контейнеров.
    pub max_depth: usize,
    /// Максимальное количество полей верхнего уровня.
    pub max_fields: usize,
    /// Строки не короче порога сжимаются zstd; `None` выключает сжатие.
    pub compression_threshold: Option<usize>,
    /// Максимальный размер одного распакованного блока.
    pub max_decompressed_len: usize,
}

impl CodecConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 64;
    pub const DEFAULT_MAX_FIELDS: usize = 65_536;
    pub const DEFAULT_MAX_DECOMPRESSED_LEN: usize = 16 * 1024 * 1024;

    /// Проверяет согласованность параметров.
    pub fn validate(&self) -> RecordResult<()> {
        ensure!(
            self.max_depth > 0,
            StatusCode::InvalidConfig,
            "codec.max_depth must be positive"
        );
        ensure!(
            self.max_fields > 0,
            StatusCode::InvalidConfig,
            "codec.max_fields must be positive"
        );
        ensure!(
            self.max_decompressed_len > 0,
            StatusCode::InvalidConfig,
            "codec.max_decompressed_len must be positive"
        );
        if let Some(threshold) = self.compression_threshold {
            ensure!(
                threshold > 0,
                StatusCode::InvalidConfig,
                "codec.compression_threshold must be positive, got {}",
                threshold
            );
        }
        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_fields: Self::DEFAULT_MAX_FIELDS,
            compression_threshold: None,
            max_decompressed_len: Self::DEFAULT_MAX_DECOMPRESSED_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CodecConfig::default();
        assert_eq!(config.max_depth, 64);
        assert_eq!(config.max_fields, 65_536);
        assert!(config.compression_threshold.is_none());
        assert_eq!(config.max_decompressed_len, 16 * 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_limits_rejected() {
        let config = CodecConfig {
            max_depth: 0,
            ..CodecConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::InvalidConfig);

        let config = CodecConfig {
            compression_threshold: Some(0),
            ..CodecConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CodecConfig {
            max_decompressed_len: 0,
            ..CodecConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
