//! Append-only little-endian byte builder, the mirror of [`ByteCursor`](crate::ByteCursor)
//!
//! Values are accepted as `u64` and checked against the target width, so an
//! oversized field fails with [`OrgError::ValueOutOfRange`] instead of wrapping.

use bytes::{BufMut, Bytes, BytesMut};

use crate::errors::{checked_narrow, OrgResult};

#[derive(Debug, Default)]
pub struct ByteWriter {
    buffer: BytesMut,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn write_u8(&mut self, field: &str, value: impl Into<u64>) -> OrgResult<()> {
        let value: u8 = checked_narrow(field, value.into())?;
        self.buffer.put_u8(value);
        Ok(())
    }

    pub fn write_u16_le(&mut self, field: &str, value: impl Into<u64>) -> OrgResult<()> {
        let value: u16 = checked_narrow(field, value.into())?;
        self.buffer.put_u16_le(value);
        Ok(())
    }

    pub fn write_u32_le(&mut self, field: &str, value: impl Into<u64>) -> OrgResult<()> {
        let value: u32 = checked_narrow(field, value.into())?;
        self.buffer.put_u32_le(value);
        Ok(())
    }

    /// Append raw bytes verbatim
    pub fn write_bytes(&mut self, raw: &[u8]) {
        self.buffer.put_slice(raw);
    }

    /// Hand out the accumulated bytes, consuming the writer
    pub fn finish(self) -> Bytes {
        self.buffer.freeze()
    }
}
