//! Lazily decoded records.
//!
//! A record is a flat map of field names to typed values, backed by a compact
//! binary encoding. A record received as bytes is decoded only when a field
//! is first read or written, so records that pass through a pipeline
//! untouched never pay the decode cost.
//!
//! ```
//! use lazyrec::{codec::ZdbCodec, record::LazyRecord, value::Value};
//!
//! let codec = ZdbCodec::new().shared();
//!
//! let mut record = LazyRecord::empty(codec.clone());
//! record.set("1", "bar").unwrap();
//! record.set("2", 42i64).unwrap();
//! let bytes = record.to_bytes().unwrap();
//!
//! let mut received = LazyRecord::from_bytes(codec, bytes);
//! assert!(!received.is_materialized());
//! assert_eq!(received.get("2"), Some(&Value::Long(42)));
//! assert_eq!(received.get("1"), Some(&Value::from("bar")));
//! ```

/// Binary codec: the `BinaryCodec` boundary, tagged format, container normalization.
pub mod codec;
/// Settings loading (defaults, file, environment).
pub mod config;
/// Application-level error type.
pub mod error;
/// Logging setup on top of `tracing`.
pub mod logging;
/// Lazy record engine, facades, registry and persistence envelope.
pub mod record;
/// Data model: values, field maps, type tags.
pub mod value;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

pub use codec::{
    BinaryCodec, CodecConfig, ContainerNormalizer, FreshContainers, RecyclingContainers,
    SharedCodec, ZdbCodec,
};
pub use config::Settings;
pub use error::{AppResult, LazyRecError};
pub use lazyrec_error::{RecordError, RecordResult, StackError, StatusCode};
pub use logging::{init_logging, LoggingConfig, LoggingHandle};
pub use record::{
    read_record, write_record, AnyRecord, LazyRecord, RecordFacade, RecordKind, RecordRegistry,
    RecordSeed, TypedRecord, UntypedRecord, SENTINEL_HASH,
};
pub use value::{FieldMap, TypeTag, TypedValue, Value, ValueKind};
