//! Реализация [`BinaryCodec`] поверх тегированного формата этого крейта.

use std::sync::Arc;

use lazyrec_error::{RecordResult, StackError};

use super::{read_fields, write_fields, BinaryCodec, CodecConfig, ContainerNormalizer, SharedCodec};
use crate::value::FieldMap;

/// Кодек записей по умолчанию.
#[derive(Debug, Clone, Default)]
pub struct ZdbCodec {
    config: CodecConfig,
}

impl ZdbCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Создаёт кодек с проверенными параметрами.
    pub fn with_config(config: CodecConfig) -> RecordResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Упаковывает кодек в разделяемый указатель.
    pub fn shared(self) -> SharedCodec {
        Arc::new(self)
    }
}

impl BinaryCodec for ZdbCodec {
    fn encode(
        &self,
        fields: &FieldMap,
    ) -> RecordResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(16 * fields.len() + 1);
        write_fields(&mut buf, fields, &self.config)?;
        Ok(buf)
    }

    fn decode_with(
        &self,
        bytes: &[u8],
        reuse: Option<FieldMap>,
        containers: &mut dyn ContainerNormalizer,
    ) -> RecordResult<FieldMap> {
        read_fields(bytes, reuse, containers, &self.config)
            .map_err(|e| StackError::new(e).context(format!("decoding {} bytes", bytes.len())))
    }
}
