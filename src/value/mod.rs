//! Модель данных записи: значения полей, карта полей и теги типов.

pub mod field_map;
pub mod type_tag;
pub mod value_base;

pub use field_map::*;
pub use type_tag::*;
pub use value_base::*;
