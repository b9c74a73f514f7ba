use std::any::Any;

use crate::{ErrorExt, StatusCode};

/// Ошибки бинарного кодека записи.
///
/// Все ошибки декодирования несут смещение (в байтах от начала буфера), на
/// котором проблема была обнаружена.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Буфер закончился раньше, чем ожидалось
    UnexpectedEof { context: String, offset: usize },

    /// Неизвестный тег значения
    InvalidTag { tag: u8, offset: usize },

    /// Строка или имя поля не являются валидным UTF-8
    InvalidUtf8 { offset: usize },

    /// Varint длиннее допустимых 5 байт
    VarintOverflow { offset: usize },

    /// Превышена допустимая глубина вложенности
    DepthLimit {
        depth: usize,
        max: usize,
        offset: Option<usize>,
    },

    /// Превышен лимит размера
    SizeLimit { what: String, size: u64, limit: u64 },

    /// Имя поля встречается в буфере повторно
    DuplicateField { name: String, offset: usize },

    /// После последнего поля остались лишние байты
    TrailingBytes { remaining: usize, offset: usize },

    /// Ошибка сжатия/распаковки
    Compression {
        operation: CompressionOp,
        reason: String,
    },

    /// Значение невозможно закодировать
    Encoding { what: String, reason: String },
}

/// Тип операции сжатия для контекста ошибки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionOp {
    Compress,
    Decompress,
}

impl CodecError {
    /// Смещение, на котором обнаружена ошибка декодирования.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::UnexpectedEof { offset, .. }
            | Self::InvalidTag { offset, .. }
            | Self::InvalidUtf8 { offset }
            | Self::VarintOverflow { offset }
            | Self::DuplicateField { offset, .. }
            | Self::TrailingBytes { offset, .. } => Some(*offset),
            Self::DepthLimit { offset, .. } => *offset,
            _ => None,
        }
    }

    /// Является ли ошибка ошибкой чтения (а не записи).
    pub fn is_decode_error(&self) -> bool {
        !matches!(
            self,
            Self::Encoding { .. }
                | Self::Compression {
                    operation: CompressionOp::Compress,
                    ..
                }
        )
    }
}

impl std::fmt::Display for CodecError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::UnexpectedEof { context, offset } => {
                write!(f, "Unexpected end of buffer while reading {context} at offset {offset}")
            }
            Self::InvalidTag { tag, offset } => {
                write!(f, "Invalid value tag 0x{tag:02X} at offset {offset}")
            }
            Self::InvalidUtf8 { offset } => write!(f, "Invalid UTF-8 at offset {offset}"),
            Self::VarintOverflow { offset } => {
                write!(f, "Varint too long at offset {offset}, possible corruption")
            }
            Self::DepthLimit { depth, max, offset } => {
                write!(f, "Nesting depth {depth} exceeds limit {max}")?;
                if let Some(o) = offset {
                    write!(f, " at offset {o}")?;
                }
                Ok(())
            }
            Self::SizeLimit { what, size, limit } => {
                write!(f, "{what} size {size} exceeds limit {limit}")
            }
            Self::DuplicateField { name, offset } => {
                write!(f, "Duplicate field '{name}' at offset {offset}")
            }
            Self::TrailingBytes { remaining, offset } => {
                write!(f, "{remaining} trailing bytes after last field at offset {offset}")
            }
            Self::Compression { operation, reason } => write!(f, "{operation:?} error: {reason}"),
            Self::Encoding { what, reason } => write!(f, "Encoding error for {what}: {reason}"),
        }
    }
}

impl std::error::Error for CodecError {}

impl ErrorExt for CodecError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnexpectedEof { .. } => StatusCode::UnexpectedEof,
            Self::InvalidTag { .. } => StatusCode::InvalidTag,
            Self::InvalidUtf8 { .. } => StatusCode::InvalidUtf8,
            Self::VarintOverflow { .. } | Self::DuplicateField { .. } => {
                StatusCode::DecodingError
            }
            Self::TrailingBytes { .. } => StatusCode::CorruptedData,
            Self::DepthLimit { .. } => StatusCode::DepthLimit,
            Self::SizeLimit { .. } => StatusCode::SizeLimit,
            Self::Compression { .. } => StatusCode::CompressionFailed,
            Self::Encoding { .. } => StatusCode::EncodingError,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
