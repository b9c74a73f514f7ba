//! `FieldMap`: плоское отображение имён полей в значения.
//!
//! Хранит пары в порядке вставки (`Vec`) и держит индекс имя -> позиция
//! (`FxHashMap`) для поиска за O(1). Порядок важен только для итерации:
//! сравнение и хеширование от него не зависят.

use std::{
    fmt,
    hash::{Hash, Hasher},
    slice, vec,
};

use rustc_hash::{FxHashMap, FxHasher};

use super::Value;

/// Упорядоченная по вставке карта полей записи.
#[derive(Clone, Default)]
pub struct FieldMap {
    entries: Vec<(String, Value)>,
    index: FxHashMap<String, usize>,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl FieldMap {
    /// Создаёт пустую карту.
    pub fn new() -> Self {
        Self::default()
    }

    /// Создаёт пустую карту с заранее выделенной ёмкостью.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Количество полей.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Возвращает `true`, если полей нет.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Проверяет наличие поля.
    pub fn contains_key(
        &self,
        name: &str,
    ) -> bool {
        self.index.contains_key(name)
    }

    /// Возвращает ссылку на значение поля.
    pub fn get(
        &self,
        name: &str,
    ) -> Option<&Value> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Возвращает изменяемую ссылку на значение поля.
    pub fn get_mut(
        &mut self,
        name: &str,
    ) -> Option<&mut Value> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    /// Вставляет или заменяет значение.
    ///
    /// При замене поле сохраняет исходную позицию, возвращается старое
    /// значение.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: Value,
    ) -> Option<Value> {
        let name = name.into();
        if let Some(&i) = self.index.get(&name) {
            return Some(std::mem::replace(&mut self.entries[i].1, value));
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
        None
    }

    /// Удаляет поле, сохраняя порядок оставшихся.
    pub fn remove(
        &mut self,
        name: &str,
    ) -> Option<Value> {
        let i = self.index.remove(name)?;
        let (_, value) = self.entries.remove(i);
        // Сдвигаем индексы всех полей после удалённого.
        for (pos, (key, _)) in self.entries.iter().enumerate().skip(i) {
            if let Some(slot) = self.index.get_mut(key) {
                *slot = pos;
            }
        }
        Some(value)
    }

    /// Итератор по парам (имя, значение) в порядке вставки.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Итератор по именам полей в порядке вставки.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Удаляет все поля.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Забирает все пары, оставляя карту пустой.
    pub fn drain(&mut self) -> vec::Drain<'_, (String, Value)> {
        self.index.clear();
        self.entries.drain(..)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Итераторы
////////////////////////////////////////////////////////////////////////////////

/// Заимствующий итератор по полям [`FieldMap`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    inner: slice::Iter<'a, (String, Value)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k.as_str(), v))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a FieldMap {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, Value);
    type IntoIter = vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = FieldMap::with_capacity(iter.size_hint().0);
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl PartialEq for FieldMap {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for FieldMap {}

impl Hash for FieldMap {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        // Сумма хешей пар не зависит от порядка вставки.
        let mut acc: u64 = 0;
        for (k, v) in self.iter() {
            let mut h = FxHasher::default();
            k.hash(&mut h);
            v.hash(&mut h);
            acc = acc.wrapping_add(h.finish());
        }
        state.write_usize(self.len());
        state.write_u64(acc);
    }
}

impl fmt::Debug for FieldMap {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
