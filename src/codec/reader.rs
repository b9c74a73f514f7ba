//! Курсор чтения по срезу байтов с отслеживанием смещения.
//!
//! Все ошибки чтения несут смещение, на котором буфер закончился.

use byteorder::{BigEndian, ByteOrder};
use lazyrec_error::CodecError;

pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Текущее смещение от начала буфера.
    pub(crate) fn offset(&self) -> usize {
        self.pos
    }

    /// Сколько байт осталось непрочитанными.
    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub(crate) fn read_u8(
        &mut self,
        context: &str,
    ) -> Result<u8, CodecError> {
        let byte = *self.buf.get(self.pos).ok_or_else(|| self.eof(context))?;
        self.pos += 1;
        Ok(byte)
    }

    /// Возвращает следующие `n` байт без копирования.
    pub(crate) fn read_exact(
        &mut self,
        n: usize,
        context: &str,
    ) -> Result<&'a [u8], CodecError> {
        if n > self.remaining() {
            return Err(self.eof(context));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub(crate) fn read_i32(
        &mut self,
        context: &str,
    ) -> Result<i32, CodecError> {
        self.read_exact(4, context).map(BigEndian::read_i32)
    }

    pub(crate) fn read_i64(
        &mut self,
        context: &str,
    ) -> Result<i64, CodecError> {
        self.read_exact(8, context).map(BigEndian::read_i64)
    }

    pub(crate) fn read_f32(
        &mut self,
        context: &str,
    ) -> Result<f32, CodecError> {
        self.read_exact(4, context).map(BigEndian::read_f32)
    }

    pub(crate) fn read_f64(
        &mut self,
        context: &str,
    ) -> Result<f64, CodecError> {
        self.read_exact(8, context).map(BigEndian::read_f64)
    }

    fn eof(
        &self,
        context: &str,
    ) -> CodecError {
        CodecError::UnexpectedEof {
            context: context.to_string(),
            offset: self.pos,
        }
    }
}
