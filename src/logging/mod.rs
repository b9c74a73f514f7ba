//! Логирование на `tracing`: консоль и, по желанию, файл с ежедневной
//! ротацией.

pub mod config;
mod filters;
mod formatter;
pub mod handle;
pub mod sinks;

pub use config::{ConsoleConfig, FileConfig, LogFormat, LoggingConfig};
pub use handle::LoggingHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

use crate::error::LazyRecError;

/// Инициализация логирования с конфигурацией.
///
/// Глобальный subscriber ставится один раз за процесс; повторный вызов
/// возвращает ошибку.
pub fn init_logging(config: LoggingConfig) -> Result<LoggingHandle, LazyRecError> {
    config.validate()?;
    config.ensure_log_dir()?;

    let env_filter = filters::build_filter_from_config(&config);
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    // Console layer
    if config.console.enabled {
        layers.push(sinks::console::layer_with_config(&config));
    }

    // File layer
    let file_guard = if config.file.enabled {
        let (file_layer, guard) = sinks::file::layer_with_config(&config);
        layers.push(file_layer);
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| LazyRecError::Logging(e.to_string()))?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        directive = %config.build_filter_directive(),
        console = config.console.enabled,
        file = config.file.enabled,
        log_dir = %config.log_dir.display(),
        "Logging system initialized"
    );

    Ok(LoggingHandle::new(file_guard))
}
