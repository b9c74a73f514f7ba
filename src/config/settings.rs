use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{
    codec::{CodecConfig, SharedCodec, ZdbCodec},
    error::LazyRecError,
    logging::LoggingConfig,
    record::RecordKind,
};

/// Префикс переменных окружения: `LAZYREC_CODEC__MAX_DEPTH=32`.
pub const ENV_PREFIX: &str = "LAZYREC";

/// Файл настроек, который ищется в текущем каталоге.
pub const DEFAULT_CONFIG_FILE: &str = "lazyrec";

/// Настройки выбора реализации записи.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSettings {
    /// Имя из реестра (`untyped`, `typed` или синоним)
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub record: RecordSettings,
    pub codec: CodecConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Settings {
    /// Загружает настройки: значения по умолчанию, затем файл, затем
    /// окружение.
    ///
    /// Без явного пути файл `lazyrec.{toml,json,yaml}` необязателен; явно
    /// указанный файл обязан существовать.
    pub fn load(path: Option<&Path>) -> Result<Self, LazyRecError> {
        let defaults = CodecConfig::default();

        let mut builder = Config::builder()
            // Добавляем значения по умолчанию
            .set_default("record.kind", RecordKind::default().name())?
            .set_default("codec.max_depth", defaults.max_depth as u64)?
            .set_default("codec.max_fields", defaults.max_fields as u64)?
            .set_default(
                "codec.max_decompressed_len",
                defaults.max_decompressed_len as u64,
            )?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let cfg = builder
            // Добавляем переменные окружения с префиксом LAZYREC_
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Десериализуем конфигурацию в нашу структуру
        Ok(cfg.try_deserialize()?)
    }

    /// Проверенные параметры кодека.
    pub fn codec_config(&self) -> Result<CodecConfig, LazyRecError> {
        self.codec
            .validate()
            .map_err(|e| LazyRecError::InvalidSetting {
                key: "codec".to_string(),
                reason: e.to_string(),
            })?;
        Ok(self.codec.clone())
    }

    /// Кодек, построенный по настройкам.
    pub fn codec(&self) -> Result<SharedCodec, LazyRecError> {
        Ok(ZdbCodec::with_config(self.codec_config()?)?.shared())
    }

    /// Вид записи по имени из реестра.
    pub fn record_kind(&self) -> Result<RecordKind, LazyRecError> {
        self.record
            .kind
            .parse()
            .map_err(|e: lazyrec_error::StackError| LazyRecError::InvalidSetting {
                key: "record.kind".to_string(),
                reason: e.to_string(),
            })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            record: RecordSettings {
                kind: RecordKind::default().name().to_string(),
            },
            codec: CodecConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
