use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Фиксированное сообщение для строгих путей чтения.
pub const READ_UNAVAILABLE_MESSAGE: &str =
    "record data is unavailable: failed to decode the underlying buffer";

/// Ошибки уровня записи и persist-конверта.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Строгий аксессор не смог материализовать запись
    #[error("{}", READ_UNAVAILABLE_MESSAGE)]
    ReadUnavailable,

    /// Пустое имя поля в `set`
    #[error("field name must not be empty")]
    EmptyFieldName,

    /// Неверный magic number в конверте
    #[error("Invalid record magic: expected {expected:?}, got {got:?}")]
    InvalidMagic { expected: [u8; 3], got: [u8; 3] },

    /// Неподдерживаемая версия конверта
    #[error("Unsupported record envelope version {found} (supported: {supported:?})")]
    UnsupportedVersion { found: u8, supported: Vec<u8> },

    /// CRC конверта не совпадает
    #[error("CRC mismatch: computed 0x{computed:08X}, recorded 0x{recorded:08X}")]
    ChecksumMismatch { computed: u32, recorded: u32 },

    /// Имя реализации записи не найдено в реестре
    #[error("Unknown record kind '{name}' (known: {known})")]
    UnknownKind { name: String, known: String },
}

impl ErrorExt for RecordError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ReadUnavailable => StatusCode::DataUnavailable,
            Self::EmptyFieldName => StatusCode::InvalidField,
            Self::InvalidMagic { .. } => StatusCode::InvalidData,
            Self::UnsupportedVersion { .. } => StatusCode::UnsupportedVersion,
            Self::ChecksumMismatch { .. } => StatusCode::ChecksumMismatch,
            Self::UnknownKind { .. } => StatusCode::InvalidConfig,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_unavailable_message_is_fixed() {
        assert_eq!(
            RecordError::ReadUnavailable.to_string(),
            READ_UNAVAILABLE_MESSAGE
        );
        assert_eq!(
            RecordError::ReadUnavailable.status_code(),
            StatusCode::DataUnavailable
        );
    }

    #[test]
    fn test_checksum_display() {
        let err = RecordError::ChecksumMismatch {
            computed: 0xDEADBEEF,
            recorded: 1,
        };
        assert!(err.to_string().contains("0xDEADBEEF"));
        assert!(err.status_code().is_critical());
    }
}
