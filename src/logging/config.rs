use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::LazyRecError;

/// Формат вывода событий.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Многострочный, для разработки
    Pretty,
    /// Одна строка на событие
    #[default]
    Compact,
    /// Машиночитаемый JSON
    Json,
}

/// Настройки консольного вывода.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_thread_ids: bool,
    pub with_line_numbers: bool,
}

/// Настройки файлового вывода (ежедневная ротация).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FileConfig {
    pub enabled: bool,
    pub format: LogFormat,
    /// Префикс имени файла; к нему добавляется дата.
    pub filename: String,
}

/// Конфигурация логирования.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Уровень по умолчанию (`error`, `warn`, `info`, `debug`, `trace`)
    pub level: String,
    /// Дополнительные директивы `EnvFilter`, например `lazyrec::codec=trace`
    pub directives: Vec<String>,
    pub log_dir: PathBuf,
    pub console: ConsoleConfig,
    pub file: FileConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: LogFormat::Compact,
            with_ansi: true,
            with_target: true,
            with_thread_ids: false,
            with_line_numbers: false,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            format: LogFormat::Json,
            filename: "lazyrec.log".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directives: Vec::new(),
            log_dir: PathBuf::from("logs"),
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl LoggingConfig {
    const LEVELS: &'static [&'static str] = &["error", "warn", "info", "debug", "trace", "off"];

    /// Собирает директиву для `EnvFilter`: уровень и дополнительные правила.
    pub fn build_filter_directive(&self) -> String {
        let mut parts = Vec::with_capacity(1 + self.directives.len());
        parts.push(self.level.to_ascii_lowercase());
        parts.extend(self.directives.iter().map(|d| d.trim().to_string()));
        parts.retain(|p| !p.is_empty());
        parts.join(",")
    }

    pub fn validate(&self) -> Result<(), LazyRecError> {
        let level = self.level.to_ascii_lowercase();
        if !Self::LEVELS.contains(&level.as_str()) {
            return Err(LazyRecError::InvalidSetting {
                key: "logging.level".to_string(),
                reason: format!("unknown level '{}'", self.level),
            });
        }
        if self.file.enabled && self.file.filename.trim().is_empty() {
            return Err(LazyRecError::InvalidSetting {
                key: "logging.file.filename".to_string(),
                reason: "must not be empty when file logging is enabled".to_string(),
            });
        }
        Ok(())
    }

    /// Создаёт каталог логов, если включён файловый вывод.
    pub fn ensure_log_dir(&self) -> Result<(), LazyRecError> {
        if self.file.enabled {
            std::fs::create_dir_all(&self.log_dir)?;
        }
        Ok(())
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LoggingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.build_filter_directive(), "info");
        assert!(!config.file.enabled);
    }

    #[test]
    fn test_filter_directive_joins_rules() {
        let config = LoggingConfig {
            level: "WARN".to_string(),
            directives: vec!["lazyrec::record=trace".to_string(), " ".to_string()],
            ..Default::default()
        };
        assert_eq!(config.build_filter_directive(), "warn,lazyrec::record=trace");
    }

    #[test]
    fn test_unknown_level_rejected() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LazyRecError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_format_parse_and_display() {
        for format in [LogFormat::Pretty, LogFormat::Compact, LogFormat::Json] {
            assert_eq!(format.to_string().parse::<LogFormat>(), Ok(format));
        }
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: LoggingConfig =
            serde_json::from_str(r#"{"level": "debug", "console": {"format": "json"}}"#).unwrap();
        assert_eq!(config.level, "debug");
        assert_eq!(config.console.format, LogFormat::Json);
        assert!(config.console.enabled);
        assert_eq!(config.file.filename, "lazyrec.log");
    }

    #[test]
    fn test_ensure_log_dir_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            log_dir: tmp.path().join("nested/logs"),
            file: FileConfig {
                enabled: true,
                ..Default::default()
            },
            ..Default::default()
        };
        config.ensure_log_dir().unwrap();
        assert!(config.log_dir.is_dir());
    }
}
