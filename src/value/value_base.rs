use std::fmt;

use ordered_float::OrderedFloat;

use super::FieldMap;

/// Значение поля записи.
///
/// Закрытое объединение скалярных типов, упорядоченной последовательности
/// и вложенного отображения. Числа с плавающей точкой обёрнуты в
/// `OrderedFloat`, поэтому `Value` реализует `Eq` и `Hash` (NaN == NaN).
///
/// Каждое значение владеет своими данными целиком: ни одно значение не
/// разделяет буфер с декодером.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    /// Логический `null`.
    Null,
    /// Логическое значение.
    Bool(bool),
    /// 32-битное целое.
    Int(i32),
    /// 64-битное целое.
    Long(i64),
    /// 32-битное число с плавающей точкой.
    Float(OrderedFloat<f32>),
    /// 64-битное число с плавающей точкой.
    Double(OrderedFloat<f64>),
    /// UTF-8 строка.
    Str(String),
    /// Упорядоченная последовательность значений.
    List(Vec<Value>),
    /// Вложенное отображение.
    Map(FieldMap),
}

/// Дискриминант [`Value`] без данных.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Long,
    Float,
    Double,
    Str,
    List,
    Map,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl Value {
    pub fn float(f: f32) -> Self {
        Value::Float(OrderedFloat(f))
    }

    pub fn double(f: f64) -> Self {
        Value::Double(OrderedFloat(f))
    }

    /// Возвращает дискриминант значения.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Long(_) => ValueKind::Long,
            Value::Float(_) => ValueKind::Float,
            Value::Double(_) => ValueKind::Double,
            Value::Str(_) => ValueKind::Str,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Целое значение любой ширины.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(i64::from(*i)),
            Value::Long(i) => Some(*i),
            _ => None,
        }
    }

    /// Число с плавающей точкой любой ширины.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(f64::from(f.into_inner())),
            Value::Double(f) => Some(f.into_inner()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&FieldMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut FieldMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Преобразует значение в `serde_json::Value`.
    ///
    /// NaN и бесконечности не представимы в JSON и становятся `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::{Number, Value as Json};

        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Long(i) => Json::from(*i),
            Value::Float(f) => Number::from_f64(f64::from(f.into_inner()))
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Double(f) => Number::from_f64(f.into_inner())
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Str(s) => Json::String(s.clone()),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Строит значение из `serde_json::Value`.
    ///
    /// Целые числа становятся `Long`, остальные числа становятся `Double`.
    pub fn from_json(json: &serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Long(i),
                None => Value::double(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::Str(s.clone()),
            Json::Array(items) => Value::List(items.iter().map(Value::from_json).collect()),
            Json::Object(obj) => Value::Map(
                obj.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Конвертации
////////////////////////////////////////////////////////////////////////////////

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Long(i)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::float(f)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::double(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<FieldMap> for Value {
    fn from(map: FieldMap) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int32",
            ValueKind::Long => "int64",
            ValueKind::Float => "float32",
            ValueKind::Double => "float64",
            ValueKind::Str => "string",
            ValueKind::List => "list",
            ValueKind::Map => "map",
        };
        f.write_str(name)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
