//! Ленивая запись: байты или материализованная карта полей.
//!
//! Запись, полученная как буфер, декодируется только при первом чтении или
//! изменении поля. До этого момента буфер является единственным источником
//! истины; после материализации им остаётся только карта полей.

use std::{
    borrow::Cow,
    fmt,
    hash::{Hash, Hasher},
};

use bytes::Bytes;
use lazyrec_error::{ensure, RecordError, RecordResult, StackError};
use rustc_hash::FxHasher;
use tracing::{debug, trace};

use crate::{
    codec::SharedCodec,
    value::{field_map, FieldMap, Value},
};

/// Хеш записи, чьи байты не удаётся декодировать. Все такие записи равны
/// между собой и хешируются в эту константу.
pub const SENTINEL_HASH: u64 = 0x4C5A_5245_C0DE_0BAD;

/// Состояние записи. Живо ровно одно представление.
enum RecordState {
    /// Буфер ещё не декодирован (или не декодируется).
    ///
    /// `pending` принимает записи `set`, сделанные после неудачного
    /// декодирования. Карта только пишется: декодирование детерминировано,
    /// поэтому такой буфер не станет читаемым и `pending` никто не читает.
    Raw { bytes: Bytes, pending: FieldMap },
    /// Карта полей является единственным источником истины.
    Materialized(FieldMap),
}

/// Одна запись данных с отложенным декодированием.
///
/// Экземпляр не синхронизирован: для передачи между потоками используйте
/// [`LazyRecord::copy`].
pub struct LazyRecord {
    codec: SharedCodec,
    state: RecordState,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl LazyRecord {
    /// Пустая материализованная запись.
    pub fn empty(codec: SharedCodec) -> Self {
        Self {
            codec,
            state: RecordState::Materialized(FieldMap::new()),
        }
    }

    /// Запись поверх закодированного буфера, без декодирования.
    pub fn from_bytes(
        codec: SharedCodec,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            codec,
            state: RecordState::Raw {
                bytes: bytes.into(),
                pending: FieldMap::new(),
            },
        }
    }

    /// Материализованная запись из готовой карты.
    pub fn from_fields(
        codec: SharedCodec,
        fields: FieldMap,
    ) -> Self {
        Self {
            codec,
            state: RecordState::Materialized(fields),
        }
    }

    pub fn codec(&self) -> &SharedCodec {
        &self.codec
    }

    pub fn is_materialized(&self) -> bool {
        matches!(self.state, RecordState::Materialized(_))
    }

    /// Исходный буфер, пока запись не материализована.
    pub fn raw_bytes(&self) -> Option<&Bytes> {
        match &self.state {
            RecordState::Raw { bytes, .. } => Some(bytes),
            RecordState::Materialized(_) => None,
        }
    }

    /// Декодирует буфер, если это ещё не сделано.
    ///
    /// Возвращает `false`, если буфер не декодируется; состояние при этом не
    /// меняется, повторный вызов даст тот же результат.
    pub fn materialize(&mut self) -> bool {
        self.try_materialize().is_ok()
    }

    /// То же, что [`materialize`](Self::materialize), но с ошибкой кодека.
    pub fn try_materialize(&mut self) -> RecordResult<()> {
        let RecordState::Raw { bytes, .. } = &self.state else {
            return Ok(());
        };

        match self.codec.decode(&bytes[..]) {
            Ok(fields) => {
                trace!(
                    bytes = bytes.len(),
                    fields = fields.len(),
                    "Record materialized"
                );
                self.state = RecordState::Materialized(fields);
                Ok(())
            }
            Err(e) => {
                debug!(bytes = bytes.len(), error = %e, "Record buffer is not decodable");
                Err(e)
            }
        }
    }

    /// Значение поля; `None`, если поля нет или буфер не декодируется.
    pub fn get(
        &mut self,
        field: &str,
    ) -> Option<&Value> {
        if !self.materialize() {
            return None;
        }
        self.fields()?.get(field)
    }

    /// Есть ли поле в записи.
    ///
    /// # Errors
    /// `ReadUnavailable`, если буфер не декодируется.
    pub fn has(
        &mut self,
        field: &str,
    ) -> RecordResult<bool> {
        Ok(self.strict_fields()?.contains_key(field))
    }

    /// Количество полей.
    ///
    /// # Errors
    /// `ReadUnavailable`, если буфер не декодируется.
    pub fn field_count(&mut self) -> RecordResult<usize> {
        Ok(self.strict_fields()?.len())
    }

    /// Записывает значение поля.
    ///
    /// Результат материализации не проверяется: если буфер не декодируется,
    /// значение попадает в карту ожидающих записей, которую `get` не видит.
    pub fn set(
        &mut self,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> RecordResult<()> {
        let field = field.into();
        ensure!(!field.is_empty(), RecordError::EmptyFieldName);

        self.materialize();
        let target = match &mut self.state {
            RecordState::Materialized(fields) => fields,
            RecordState::Raw { pending, .. } => pending,
        };
        target.insert(field, value.into());
        Ok(())
    }

    /// Удаляет поле и возвращает его значение.
    ///
    /// # Errors
    /// `ReadUnavailable`, если буфер не декодируется.
    pub fn remove(
        &mut self,
        field: &str,
    ) -> RecordResult<Option<Value>> {
        if !self.has(field)? {
            return Ok(None);
        }
        Ok(self.strict_fields()?.remove(field))
    }

    /// Синоним [`remove`](Self::remove).
    pub fn get_and_remove(
        &mut self,
        field: &str,
    ) -> RecordResult<Option<Value>> {
        self.remove(field)
    }

    /// Итератор по полям в порядке вставки.
    ///
    /// Если буфер не декодируется, итератор пуст. Итератор можно клонировать
    /// и пройти заново.
    pub fn iter(&mut self) -> Fields<'_> {
        self.materialize();
        Fields {
            inner: self.fields().map(FieldMap::iter),
        }
    }

    /// Независимая копия записи в нематериализованном виде.
    ///
    /// Материализованная запись кодируется заново, так как могла измениться
    /// после последнего кодирования. Нематериализованная копирует свой буфер
    /// в новый; неразборчивый буфер остаётся неразборчивым.
    pub fn copy(&self) -> RecordResult<LazyRecord> {
        let state = match &self.state {
            RecordState::Materialized(fields) => RecordState::Raw {
                bytes: Bytes::from(self.codec.encode(fields)?),
                pending: FieldMap::new(),
            },
            RecordState::Raw { bytes, pending } => RecordState::Raw {
                bytes: Bytes::copy_from_slice(bytes),
                pending: pending.clone(),
            },
        };

        trace!(materialized = self.is_materialized(), "Record copied");
        Ok(LazyRecord {
            codec: self.codec.clone(),
            state,
        })
    }

    /// Закодированное представление записи.
    ///
    /// Материализованная запись кодируется, карта полей остаётся на месте.
    pub fn to_bytes(&self) -> RecordResult<Bytes> {
        match &self.state {
            RecordState::Materialized(fields) => Ok(Bytes::from(self.codec.encode(fields)?)),
            RecordState::Raw { bytes, .. } => Ok(bytes.clone()),
        }
    }

    /// Хеш логического содержимого.
    ///
    /// Не зависит от порядка полей; для неразборчивого буфера равен
    /// [`SENTINEL_HASH`].
    pub fn content_hash(&self) -> u64 {
        match self.content() {
            Some(fields) => {
                let mut hasher = FxHasher::default();
                fields.hash(&mut hasher);
                hasher.finish()
            }
            None => SENTINEL_HASH,
        }
    }

    /// Содержимое записи без изменения её состояния.
    ///
    /// Нематериализованная запись декодируется во временную карту, которая
    /// не кешируется.
    fn content(&self) -> Option<Cow<'_, FieldMap>> {
        match &self.state {
            RecordState::Materialized(fields) => Some(Cow::Borrowed(fields)),
            RecordState::Raw { bytes, .. } => self.codec.decode(&bytes[..]).ok().map(Cow::Owned),
        }
    }

    fn fields(&self) -> Option<&FieldMap> {
        match &self.state {
            RecordState::Materialized(fields) => Some(fields),
            RecordState::Raw { .. } => None,
        }
    }

    fn strict_fields(&mut self) -> RecordResult<&mut FieldMap> {
        if !self.materialize() {
            return Err(StackError::new(RecordError::ReadUnavailable));
        }
        match &mut self.state {
            RecordState::Materialized(fields) => Ok(fields),
            RecordState::Raw { .. } => Err(StackError::new(RecordError::ReadUnavailable)),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Итератор
////////////////////////////////////////////////////////////////////////////////

/// Итератор по полям [`LazyRecord`].
#[derive(Clone, Debug, Default)]
pub struct Fields<'a> {
    inner: Option<field_map::Iter<'a>>,
}

impl<'a> Iterator for Fields<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Some(it) => it.size_hint(),
            None => (0, Some(0)),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl PartialEq for LazyRecord {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        match (self.content(), other.content()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => true,
            _ => false,
        }
    }
}

impl Eq for LazyRecord {}

impl Hash for LazyRecord {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        state.write_u64(self.content_hash());
    }
}

impl fmt::Debug for LazyRecord {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match &self.state {
            RecordState::Raw { bytes, pending } => f
                .debug_struct("LazyRecord")
                .field("state", &"raw")
                .field("bytes", &bytes.len())
                .field("pending", &pending.len())
                .finish(),
            RecordState::Materialized(fields) => f
                .debug_struct("LazyRecord")
                .field("state", &"materialized")
                .field("fields", fields)
                .finish(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
