//! Нормализация контейнеров при декодировании.
//!
//! Декодер не создаёт последовательности сам: он запрашивает их у
//! [`ContainerNormalizer`]. Это единственная точка, где решается, будет ли
//! список свежим (независимым) буфером или переиспользованным буфером из
//! прошлого декодирования.
//!
//! Ленивая запись всегда декодирует через [`FreshContainers`]: каждое
//! значение, которое она отдаёт наружу, можно хранить, изменять и
//! передавать другому владельцу, не задевая внутренности декодера.
//! Отображения нормализации не требуют: декодер всегда строит новую
//! [`FieldMap`](crate::value::FieldMap).

use crate::value::Value;

/// Поставщик последовательностей для декодера.
pub trait ContainerNormalizer {
    /// Возвращает пустую последовательность для `len` элементов.
    ///
    /// `recycled`: буфер того же поля из карты, переданной декодеру для
    /// переиспользования (если он был).
    fn sequence(
        &mut self,
        len: usize,
        recycled: Option<Vec<Value>>,
    ) -> Vec<Value>;
}

/// Всегда выделяет новый буфер, переданный на переиспользование отбрасывает.
#[derive(Debug, Default, Clone, Copy)]
pub struct FreshContainers;

impl ContainerNormalizer for FreshContainers {
    fn sequence(
        &mut self,
        len: usize,
        recycled: Option<Vec<Value>>,
    ) -> Vec<Value> {
        drop(recycled);
        Vec::with_capacity(len)
    }
}

/// Переиспользует буферы прошлого декодирования.
///
/// Экономит аллокации, когда одна и та же карта декодируется повторно,
/// но ленивая запись им не пользуется.
#[derive(Debug, Default)]
pub struct RecyclingContainers {
    reused: usize,
}

impl RecyclingContainers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Сколько буферов было переиспользовано.
    pub fn reused(&self) -> usize {
        self.reused
    }
}

impl ContainerNormalizer for RecyclingContainers {
    fn sequence(
        &mut self,
        len: usize,
        recycled: Option<Vec<Value>>,
    ) -> Vec<Value> {
        match recycled {
            Some(mut buf) => {
                buf.clear();
                buf.reserve(len);
                self.reused += 1;
                buf
            }
            None => Vec::with_capacity(len),
        }
    }
}
