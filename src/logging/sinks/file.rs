use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling::daily};
use tracing_subscriber::{layer::Layer as LayerTrait, registry::LookupSpan};

use crate::logging::{config::LoggingConfig, formatter};

/// Файловый слой с ежедневной ротацией.
///
/// Guard нужно держать, пока логирование активно: при его drop
/// недописанные события сбрасываются на диск.
pub fn layer_with_config<S>(
    config: &LoggingConfig
) -> (Box<dyn LayerTrait<S> + Send + Sync>, WorkerGuard)
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let file_appender = daily(&config.log_dir, &config.file.filename);
    let (writer, guard) = non_blocking(file_appender);

    let layer = formatter::build_formatter(&config.console, config.file.format, writer, false);
    (layer, guard)
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::{prelude::*, registry::Registry};

    use super::*;
    use crate::logging::config::FileConfig;

    #[test]
    fn test_file_layer_writes_into_log_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = LoggingConfig {
            log_dir: tmp.path().to_path_buf(),
            file: FileConfig {
                enabled: true,
                filename: "test.log".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let (layer, guard) = layer_with_config::<Registry>(&cfg);
        tracing::subscriber::with_default(Registry::default().with(layer), || {
            tracing::info!("file layer smoke test");
        });
        drop(guard);

        let written: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("test.log"))
            .collect();
        assert_eq!(written.len(), 1);
    }
}
