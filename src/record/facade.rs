//! Фасады уровня полей над [`LazyRecord`].
//!
//! [`UntypedRecord`] передаёт вызовы записи как есть. [`TypedRecord`]
//! дополнительно хранит тег типа для каждого поля; теги живут только в
//! памяти процесса и в бинарный формат не попадают.

use bytes::Bytes;
use lazyrec_error::RecordResult;
use rustc_hash::FxHashMap;

use super::{Fields, LazyRecord};
use crate::{
    codec::SharedCodec,
    value::{TypeTag, TypedValue, Value},
};

/// Общая поверхность фасадов: всё, что не зависит от типизации.
pub trait RecordFacade {
    fn record(&self) -> &LazyRecord;

    fn record_mut(&mut self) -> &mut LazyRecord;

    fn is_materialized(&self) -> bool {
        self.record().is_materialized()
    }

    fn has(
        &mut self,
        field: &str,
    ) -> RecordResult<bool> {
        self.record_mut().has(field)
    }

    fn field_count(&mut self) -> RecordResult<usize> {
        self.record_mut().field_count()
    }

    fn iter(&mut self) -> Fields<'_> {
        self.record_mut().iter()
    }

    fn to_bytes(&self) -> RecordResult<Bytes> {
        self.record().to_bytes()
    }
}

////////////////////////////////////////////////////////////////////////////////
// UntypedRecord
////////////////////////////////////////////////////////////////////////////////

/// Фасад без типизации.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct UntypedRecord {
    record: LazyRecord,
}

impl UntypedRecord {
    pub fn empty(codec: SharedCodec) -> Self {
        Self::new(LazyRecord::empty(codec))
    }

    pub fn from_bytes(
        codec: SharedCodec,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self::new(LazyRecord::from_bytes(codec, bytes))
    }

    pub fn new(record: LazyRecord) -> Self {
        Self { record }
    }

    pub fn into_inner(self) -> LazyRecord {
        self.record
    }

    pub fn get(
        &mut self,
        field: &str,
    ) -> Option<&Value> {
        self.record.get(field)
    }

    pub fn set(
        &mut self,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> RecordResult<()> {
        self.record.set(field, value)
    }

    pub fn remove(
        &mut self,
        field: &str,
    ) -> RecordResult<Option<Value>> {
        self.record.remove(field)
    }

    pub fn get_and_remove(
        &mut self,
        field: &str,
    ) -> RecordResult<Option<Value>> {
        self.record.get_and_remove(field)
    }

    pub fn copy(&self) -> RecordResult<Self> {
        Ok(Self::new(self.record.copy()?))
    }
}

impl RecordFacade for UntypedRecord {
    fn record(&self) -> &LazyRecord {
        &self.record
    }

    fn record_mut(&mut self) -> &mut LazyRecord {
        &mut self.record
    }
}

////////////////////////////////////////////////////////////////////////////////
// TypedRecord
////////////////////////////////////////////////////////////////////////////////

/// Фасад с тегами типов.
///
/// Карта тегов и карта значений меняются вместе в `set`, `remove` и
/// `get_and_remove`. Запись, восстановленная из байтов, тегов не имеет:
/// её значения читаются с тегом [`TypeTag::Unknown`].
#[derive(Debug, PartialEq, Eq)]
pub struct TypedRecord {
    record: LazyRecord,
    tags: FxHashMap<String, TypeTag>,
}

impl TypedRecord {
    pub fn empty(codec: SharedCodec) -> Self {
        Self::new(LazyRecord::empty(codec))
    }

    pub fn from_bytes(
        codec: SharedCodec,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self::new(LazyRecord::from_bytes(codec, bytes))
    }

    pub fn new(record: LazyRecord) -> Self {
        Self {
            record,
            tags: FxHashMap::default(),
        }
    }

    pub fn into_inner(self) -> LazyRecord {
        self.record
    }

    /// Записанный тег поля, без обращения к значению.
    pub fn tag(
        &self,
        field: &str,
    ) -> Option<TypeTag> {
        self.tags.get(field).copied()
    }

    /// Значение поля вместе с тегом.
    ///
    /// Null возвращается как типизированный null, а не как отсутствие.
    pub fn get(
        &mut self,
        field: &str,
    ) -> Option<TypedValue> {
        let tag = self.tags.get(field).copied();
        let value = self.record.get(field)?;

        if value.is_null() {
            return Some(TypedValue::null(tag.unwrap_or(TypeTag::Null)));
        }
        Some(TypedValue::new(tag.unwrap_or(TypeTag::Unknown), value.clone()))
    }

    /// Записывает значение и его тег. Тег не сверяется со значением.
    pub fn set(
        &mut self,
        field: impl Into<String>,
        value: impl Into<Value>,
        tag: TypeTag,
    ) -> RecordResult<()> {
        let field = field.into();
        self.record.set(field.as_str(), value)?;
        self.tags.insert(field, tag);
        Ok(())
    }

    pub fn remove(
        &mut self,
        field: &str,
    ) -> RecordResult<Option<Value>> {
        let removed = self.record.remove(field)?;
        self.tags.remove(field);
        Ok(removed)
    }

    pub fn get_and_remove(
        &mut self,
        field: &str,
    ) -> RecordResult<Option<TypedValue>> {
        let removed = self.record.get_and_remove(field)?;
        let tag = self.tags.remove(field);

        Ok(removed.map(|value| {
            if value.is_null() {
                TypedValue::null(tag.unwrap_or(TypeTag::Null))
            } else {
                TypedValue::new(tag.unwrap_or(TypeTag::Unknown), value)
            }
        }))
    }

    /// Копия записи вместе с картой тегов.
    pub fn copy(&self) -> RecordResult<Self> {
        Ok(Self {
            record: self.record.copy()?,
            tags: self.tags.clone(),
        })
    }
}

impl RecordFacade for TypedRecord {
    fn record(&self) -> &LazyRecord {
        &self.record
    }

    fn record_mut(&mut self) -> &mut LazyRecord {
        &mut self.record
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::codec::ZdbCodec;

    fn codec() -> SharedCodec {
        ZdbCodec::new().shared()
    }

    #[test]
    fn test_untyped_passes_through() {
        let mut record = UntypedRecord::empty(codec());
        record.set("a", 1).unwrap();
        record.set("b", "two").unwrap();

        assert_eq!(record.get("a"), Some(&Value::Int(1)));
        assert!(record.has("b").unwrap());
        assert_eq!(record.field_count().unwrap(), 2);
        assert_eq!(record.remove("a").unwrap(), Some(Value::Int(1)));
        assert_eq!(record.iter().count(), 1);
    }

    #[test]
    fn test_untyped_equality_is_record_equality() {
        let mut a = UntypedRecord::empty(codec());
        a.set("x", 1).unwrap();
        let b = UntypedRecord::from_bytes(codec(), a.to_bytes().unwrap());
        assert_eq!(a, b);
    }

    #[rstest]
    #[case(Value::Int(5), TypeTag::Int)]
    #[case(Value::Long(5), TypeTag::Long)]
    #[case(Value::from("s"), TypeTag::String)]
    #[case(Value::List(vec![Value::Bool(true)]), TypeTag::List)]
    fn test_typed_get_returns_recorded_tag(
        #[case] value: Value,
        #[case] tag: TypeTag,
    ) {
        let mut record = TypedRecord::empty(codec());
        record.set("f", value.clone(), tag).unwrap();
        assert_eq!(record.get("f"), Some(TypedValue::new(tag, value)));
    }

    #[test]
    fn test_typed_tag_is_not_checked_against_value() {
        let mut record = TypedRecord::empty(codec());
        record.set("f", "text", TypeTag::Int).unwrap();
        assert_eq!(record.get("f").unwrap().tag, TypeTag::Int);
    }

    #[test]
    fn test_typed_null_is_not_absence() {
        let mut record = TypedRecord::empty(codec());
        record.set("n", Value::Null, TypeTag::Long).unwrap();

        let got = record.get("n").unwrap();
        assert!(got.is_null());
        assert_eq!(got.tag, TypeTag::Long);
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_typed_untagged_value_is_unknown() {
        let mut plain = LazyRecord::empty(codec());
        plain.set("v", 3i64).unwrap();
        plain.set("n", Value::Null).unwrap();

        let mut record = TypedRecord::new(plain);
        assert_eq!(
            record.get("v"),
            Some(TypedValue::new(TypeTag::Unknown, Value::Long(3)))
        );
        assert_eq!(record.get("n"), Some(TypedValue::NULL));
    }

    #[test]
    fn test_typed_remove_keeps_maps_in_sync() {
        let mut record = TypedRecord::empty(codec());
        record.set("a", 1, TypeTag::Int).unwrap();
        record.set("b", 2i64, TypeTag::Long).unwrap();

        assert_eq!(record.remove("a").unwrap(), Some(Value::Int(1)));
        assert_eq!(record.tag("a"), None);

        let taken = record.get_and_remove("b").unwrap();
        assert_eq!(taken, Some(TypedValue::new(TypeTag::Long, Value::Long(2))));
        assert_eq!(record.tag("b"), None);
        assert_eq!(record.field_count().unwrap(), 0);
    }

    #[test]
    fn test_typed_remove_on_corrupted_record_keeps_tags() {
        let mut record = TypedRecord::from_bytes(codec(), &b"foo"[..]);
        record.set("a", 1, TypeTag::Int).unwrap();

        assert!(record.remove("a").is_err());
        assert_eq!(record.tag("a"), Some(TypeTag::Int));
    }

    #[test]
    fn test_typed_equality_includes_tags() {
        let mut a = TypedRecord::empty(codec());
        a.set("x", 1, TypeTag::Int).unwrap();
        let mut b = TypedRecord::empty(codec());
        b.set("x", 1, TypeTag::Long).unwrap();

        assert_ne!(a, b);
        assert_eq!(a.record(), b.record());

        let c = a.copy().unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn test_typed_copy_carries_tags_bytes_do_not() {
        let mut record = TypedRecord::empty(codec());
        record.set("a", 5, TypeTag::Int).unwrap();

        let mut copy = record.copy().unwrap();
        assert_eq!(copy.get("a"), Some(TypedValue::new(TypeTag::Int, Value::Int(5))));

        let mut rebuilt = TypedRecord::from_bytes(codec(), copy.to_bytes().unwrap());
        assert_eq!(
            rebuilt.get("a"),
            Some(TypedValue::new(TypeTag::Unknown, Value::Int(5)))
        );
    }
}
