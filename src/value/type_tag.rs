//! Теги типов для типизированного фасада записи.
//!
//! Тег это процесс-локальная метаинформация о том, каким логическим типом
//! поле было записано. В бинарный формат теги не попадают.

use std::{fmt, str::FromStr};

use super::Value;

/// Логический тип поля.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Null,
    Bool,
    Int,
    Long,
    Float,
    Double,
    String,
    List,
    Map,
    /// Значение есть, но тег для него не записан (например, запись была
    /// восстановлена из байтов).
    Unknown,
}

/// Значение вместе с его тегом.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedValue {
    pub tag: TypeTag,
    pub value: Value,
}

impl TypedValue {
    /// Типизированный null: возвращается вместо значения `Value::Null`,
    /// в отличие от отсутствия поля.
    pub const NULL: TypedValue = TypedValue {
        tag: TypeTag::Null,
        value: Value::Null,
    };

    pub fn new(
        tag: TypeTag,
        value: Value,
    ) -> Self {
        Self { tag, value }
    }

    /// Типизированный null с сохранённым тегом поля.
    pub fn null(tag: TypeTag) -> Self {
        Self {
            tag,
            value: Value::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl TypeTag {
    /// Все имена, принимаемые `FromStr`.
    pub const NAMES: &'static [&'static str] = &[
        "NULL", "BOOL", "INT", "LONG", "FLOAT", "DOUBLE", "STRING", "LIST", "MAP", "UNKNOWN",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Null => "NULL",
            TypeTag::Bool => "BOOL",
            TypeTag::Int => "INT",
            TypeTag::Long => "LONG",
            TypeTag::Float => "FLOAT",
            TypeTag::Double => "DOUBLE",
            TypeTag::String => "STRING",
            TypeTag::List => "LIST",
            TypeTag::Map => "MAP",
            TypeTag::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = match s.to_ascii_uppercase().as_str() {
            "NULL" => TypeTag::Null,
            "BOOL" | "BOOLEAN" => TypeTag::Bool,
            "INT" | "INT32" | "I32" => TypeTag::Int,
            "LONG" | "INT64" | "I64" => TypeTag::Long,
            "FLOAT" | "FLOAT32" | "F32" => TypeTag::Float,
            "DOUBLE" | "FLOAT64" | "F64" => TypeTag::Double,
            "STRING" | "STR" => TypeTag::String,
            "LIST" | "ARRAY" => TypeTag::List,
            "MAP" | "OBJECT" => TypeTag::Map,
            "UNKNOWN" => TypeTag::Unknown,
            other => return Err(format!("unknown type tag '{other}'")),
        };
        Ok(tag)
    }
}
