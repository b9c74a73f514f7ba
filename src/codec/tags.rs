//! Определение тегов для бинарного формата значений `Value`.
//!
//! Каждое значение поля начинается с однобайтового тега.
//! Используется в модулях `decode` и `encode`.

/// Строка (UTF-8)
pub const TAG_STR: u8 = 0x01;
/// Целое число (i64)
pub const TAG_LONG: u8 = 0x02;
/// Число с плавающей точкой (f64)
pub const TAG_DOUBLE: u8 = 0x03;
/// Null
pub const TAG_NULL: u8 = 0x04;
/// Последовательность произвольных значений
pub const TAG_LIST: u8 = 0x05;
/// Вложенное отображение (map<string, Value>)
pub const TAG_MAP: u8 = 0x06;
/// Целое число (i32)
pub const TAG_INT: u8 = 0x07;
/// Число с плавающей точкой (f32)
pub const TAG_FLOAT: u8 = 0x08;
/// Логическое значение (bool)
pub const TAG_BOOL: u8 = 0x0B;
/// Сжатый блок данных (zstd) с одним закодированным значением внутри
pub const TAG_COMPRESSED: u8 = 0x0C;
