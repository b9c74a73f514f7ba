use std::io;

use lazyrec_error::StackError;
use thiserror::Error;

pub type AppResult<T> = Result<T, LazyRecError>;

/// Ошибки прикладного уровня: загрузка настроек, логирование, файлы, JSON.
///
/// Ошибки самой записи приходят как [`StackError`] и сохраняют свой код и
/// цепочку контекстов.
#[derive(Error, Debug)]
pub enum LazyRecError {
    // ==== System / External ====
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    // ==== Configuration ====
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    // ==== Logging ====
    #[error("Logging setup failed: {0}")]
    Logging(String),

    // ==== Record ====
    #[error("{0}")]
    Record(#[from] StackError),
}

impl LazyRecError {
    /// Является ли ошибка ошибкой чтения записи (а не окружения).
    pub fn is_record_error(&self) -> bool {
        matches!(self, Self::Record(_))
    }
}
