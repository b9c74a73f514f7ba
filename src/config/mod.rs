pub mod settings;

pub use settings::{RecordSettings, Settings, DEFAULT_CONFIG_FILE, ENV_PREFIX};
