//! Выбор реализации записи по имени из конфигурации.
//!
//! Реестр это статическая таблица, собранная на этапе компиляции. Каждая
//! запись таблицы связывает имя (и его синонимы) с [`RecordKind`].

use std::{fmt, str::FromStr};

use bytes::Bytes;
use lazyrec_error::{RecordError, RecordResult, StackError};
use serde::{Deserialize, Serialize};

use super::{LazyRecord, RecordFacade, TypedRecord, UntypedRecord};
use crate::{codec::SharedCodec, value::Value};

/// Реализация фасада записи.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecordKind {
    #[default]
    Untyped,
    Typed,
}

/// Описание одной реализации в реестре.
#[derive(Debug)]
pub struct RegistryEntry {
    pub kind: RecordKind,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

/// Статический реестр реализаций записи.
pub struct RecordRegistry;

impl RecordRegistry {
    pub const ENTRIES: &'static [RegistryEntry] = &[
        RegistryEntry {
            kind: RecordKind::Untyped,
            name: "untyped",
            aliases: &["plain", "generic"],
            description: "field access without type tags",
        },
        RegistryEntry {
            kind: RecordKind::Typed,
            name: "typed",
            aliases: &["tagged"],
            description: "field access with process-local type tags",
        },
    ];

    /// Ищет реализацию по имени или синониму, без учёта регистра.
    pub fn lookup(name: &str) -> Option<&'static RegistryEntry> {
        let name = name.trim();
        Self::ENTRIES.iter().find(|entry| {
            entry.name.eq_ignore_ascii_case(name)
                || entry.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
        })
    }

    /// Основные имена всех реализаций.
    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ENTRIES.iter().map(|entry| entry.name)
    }

    pub fn resolve(name: &str) -> RecordResult<RecordKind> {
        Self::lookup(name).map(|entry| entry.kind).ok_or_else(|| {
            StackError::new(RecordError::UnknownKind {
                name: name.to_string(),
                known: Self::names().collect::<Vec<_>>().join(", "),
            })
        })
    }
}

impl RecordKind {
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::Untyped => "untyped",
            RecordKind::Typed => "typed",
        }
    }

    pub fn create_empty(
        &self,
        codec: SharedCodec,
    ) -> AnyRecord {
        self.wrap(LazyRecord::empty(codec))
    }

    pub fn create_from_bytes(
        &self,
        codec: SharedCodec,
        bytes: impl Into<Bytes>,
    ) -> AnyRecord {
        self.wrap(LazyRecord::from_bytes(codec, bytes))
    }

    /// Оборачивает готовую запись в фасад этого вида.
    pub fn wrap(
        &self,
        record: LazyRecord,
    ) -> AnyRecord {
        match self {
            RecordKind::Untyped => AnyRecord::Untyped(UntypedRecord::new(record)),
            RecordKind::Typed => AnyRecord::Typed(TypedRecord::new(record)),
        }
    }
}

impl FromStr for RecordKind {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordRegistry::resolve(s)
    }
}

impl TryFrom<String> for RecordKind {
    type Error = StackError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RecordKind> for String {
    fn from(kind: RecordKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for RecordKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Фасад, выбранный через реестр.
#[derive(Debug, PartialEq, Eq)]
pub enum AnyRecord {
    Untyped(UntypedRecord),
    Typed(TypedRecord),
}

impl AnyRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            AnyRecord::Untyped(_) => RecordKind::Untyped,
            AnyRecord::Typed(_) => RecordKind::Typed,
        }
    }

    /// Значение поля без тега, для любого вида фасада.
    pub fn get_value(
        &mut self,
        field: &str,
    ) -> Option<&Value> {
        self.record_mut().get(field)
    }

    pub fn as_typed_mut(&mut self) -> Option<&mut TypedRecord> {
        match self {
            AnyRecord::Typed(record) => Some(record),
            AnyRecord::Untyped(_) => None,
        }
    }

    pub fn into_record(self) -> LazyRecord {
        match self {
            AnyRecord::Untyped(record) => record.into_inner(),
            AnyRecord::Typed(record) => record.into_inner(),
        }
    }
}

impl RecordFacade for AnyRecord {
    fn record(&self) -> &LazyRecord {
        match self {
            AnyRecord::Untyped(record) => record.record(),
            AnyRecord::Typed(record) => record.record(),
        }
    }

    fn record_mut(&mut self) -> &mut LazyRecord {
        match self {
            AnyRecord::Untyped(record) => record.record_mut(),
            AnyRecord::Typed(record) => record.record_mut(),
        }
    }
}
