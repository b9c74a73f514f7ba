use std::fmt;

use num_enum::TryFromPrimitive;
#[cfg(feature = "serde_repr")]
use serde_repr::{Deserialize_repr, Serialize_repr};
#[cfg(feature = "strum")]
use strum_macros::{AsRefStr, EnumIter};

/// Коды статуса для категоризации ошибок.
///
/// # Диапазоны:
/// - 0xxx: Успех
/// - 1xxx: Общие ошибки
/// - 2xxx: Ошибки данных записи
/// - 5xxx: Хранение и persist-конверт
/// - 6xxx: IO
/// - 8xxx: Ошибки бинарного формата
///
/// # Реализация:
/// - `num_enum::TryFromPrimitive` даёт нативную реализацию `TryFrom<u32>`.
/// - опционально: `strum` для `AsRefStr`/`EnumIter` (feature = "strum").
/// - опционально: `serde_repr` для сериализации в виде числового значения
///   (feature = "serde_repr").
#[cfg_attr(feature = "strum", derive(AsRefStr, EnumIter))]
#[cfg_attr(feature = "serde_repr", derive(Serialize_repr, Deserialize_repr))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 0xxx: Успех ===
    Success = 0,

    // === 1xxx: Общие ошибки ===
    Unknown = 1000,
    Unsupported = 1001,
    Unexpected = 1002,
    Internal = 1003,
    InvalidArgs = 1004,
    InvalidConfig = 1005,

    // === 2xxx: Ошибки данных ===
    NotFound = 2000,
    TypeError = 2002,
    InvalidField = 2003,
    InvalidValue = 2004,
    InvalidData = 2009,
    DataUnavailable = 2010,

    // === 5xxx: Хранилище ===
    CorruptedData = 5002,
    SerializationFailed = 5003,
    DeserializationFailed = 5004,
    CompressionFailed = 5005,
    ChecksumMismatch = 5006,

    // === 6xxx: IO ===
    Io = 6000,
    UnexpectedEof = 6007,

    // === 8xxx: Формат ===
    UnsupportedVersion = 8002,
    InvalidUtf8 = 8004,
    SizeLimit = 8007,
    DepthLimit = 8008,
    EncodingError = 8010,
    DecodingError = 8011,
    InvalidTag = 8012,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Числовое представление кода статуса.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Пытается получить вариант `StatusCode` из `u32`.
    ///
    /// Возвращает `None`, если значение не соответствует ни одному варианту.
    pub fn from_u32(v: u32) -> Option<Self> {
        Self::try_from(v).ok()
    }

    /// Вернёт `true`, если переданный `code` означает успешный результат.
    pub fn is_success(code: u32) -> bool {
        Self::Success as u32 == code
    }

    /// Ошибка вызвана данными или аргументами вызывающей стороны.
    pub fn is_client_error(&self) -> bool {
        (2000..=2999).contains(&self.code()) || matches!(self, Self::InvalidArgs)
    }

    /// Ошибка бинарного формата (диапазон 8xxx).
    pub fn is_format_error(&self) -> bool {
        (8000..=8999).contains(&self.code())
    }

    /// Требуется ли логировать как критическую ошибку.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Self::Internal | Self::CorruptedData | Self::ChecksumMismatch
        )
    }

    /// Рекомендуемый уровень логирования для данного кода.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::Success => LogLevel::Trace,
            Self::NotFound | Self::DataUnavailable => LogLevel::Debug,
            Self::InvalidArgs
            | Self::TypeError
            | Self::InvalidField
            | Self::InvalidValue
            | Self::InvalidData => LogLevel::Info,
            Self::Internal | Self::CorruptedData | Self::ChecksumMismatch => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StatusCode
////////////////////////////////////////////////////////////////////////////////

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        #[cfg(feature = "strum")]
        {
            write!(f, "{} ({})", self.as_ref(), self.code())
        }
        #[cfg(not(feature = "strum"))]
        {
            write!(f, "{:?} ({})", self, self.code())
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет разделение клиентских ошибок и ошибок формата.
    #[test]
    fn test_client_vs_format() {
        assert!(StatusCode::InvalidArgs.is_client_error());
        assert!(StatusCode::DataUnavailable.is_client_error());
        assert!(!StatusCode::DecodingError.is_client_error());
        assert!(StatusCode::DecodingError.is_format_error());
        assert!(StatusCode::InvalidTag.is_format_error());
        assert!(!StatusCode::Io.is_format_error());
    }

    /// Тест проверяет конвертацию через `TryFrom<u32>` и `from_u32`.
    #[test]
    fn test_from_try_from_u32() {
        let n = StatusCode::DataUnavailable.code();
        assert_eq!(
            StatusCode::try_from(n).unwrap(),
            StatusCode::DataUnavailable
        );
        assert!(StatusCode::from_u32(99999).is_none());
    }

    #[test]
    fn test_code_and_into() {
        let c = StatusCode::NotFound;
        assert_eq!(c.code(), 2000);
        let n: u32 = c.into();
        assert_eq!(n, 2000);
        assert!(StatusCode::is_success(StatusCode::Success.code()));
        assert!(!StatusCode::is_success(StatusCode::NotFound.code()));
    }

    /// Тест проверяет, что критические ошибки помечаются корректно.
    #[test]
    fn test_is_critical() {
        assert!(StatusCode::Internal.is_critical());
        assert!(StatusCode::ChecksumMismatch.is_critical());
        assert!(!StatusCode::DecodingError.is_critical());
    }

    #[test]
    fn test_log_level_mappings() {
        assert_eq!(StatusCode::Success.log_level(), LogLevel::Trace);
        assert_eq!(StatusCode::DataUnavailable.log_level(), LogLevel::Debug);
        assert_eq!(StatusCode::InvalidField.log_level(), LogLevel::Info);
        assert_eq!(StatusCode::DecodingError.log_level(), LogLevel::Warn);
        assert_eq!(StatusCode::CorruptedData.log_level(), LogLevel::Error);
    }

    /// Тест проверяет формат `Display`: строка должна содержать имя варианта
    /// и числовой код.
    #[test]
    fn test_display_contains_name_and_code() {
        let s = format!("{}", StatusCode::DecodingError);
        assert!(s.contains("8011"), "Display must contain code, got: {s}");
        assert!(
            s.contains("DecodingError"),
            "Display must contain variant name, got: {s}"
        );
    }
}
