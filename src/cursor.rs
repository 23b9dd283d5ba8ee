//! Sequential, bounds-checked reading of little-endian fields
//!
//! [`bytes::Buf`] getters panic when the buffer runs dry. Organya files come from
//! arbitrary third-party editors, so every read here checks the remaining length
//! first and reports [`OrgError::UnexpectedEndOfData`] instead.

use bytes::{Buf, Bytes};

use crate::errors::{OrgError, OrgResult};

/// Read cursor over an immutable byte buffer
#[derive(Debug, Clone)]
pub struct ByteCursor {
    data: Bytes,
    len: usize,
}

impl ByteCursor {
    pub fn new(data: Bytes) -> Self {
        let len = data.len();
        Self { data, len }
    }

    /// Offset of the next unread byte, relative to the start of the buffer
    pub fn position(&self) -> usize {
        self.len - self.data.remaining()
    }

    /// Number of bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.remaining()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Fail unless at least `needed` bytes are left
    pub fn ensure(&self, needed: usize) -> OrgResult<()> {
        if self.remaining() < needed {
            return Err(OrgError::UnexpectedEndOfData {
                offset: self.position(),
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> OrgResult<u8> {
        self.ensure(1)?;
        Ok(self.data.get_u8())
    }

    pub fn read_u16_le(&mut self) -> OrgResult<u16> {
        self.ensure(2)?;
        Ok(self.data.get_u16_le())
    }

    pub fn read_u32_le(&mut self) -> OrgResult<u32> {
        self.ensure(4)?;
        Ok(self.data.get_u32_le())
    }

    /// Consume exactly `n` raw bytes
    pub fn read_bytes(&mut self, n: usize) -> OrgResult<Bytes> {
        self.ensure(n)?;
        Ok(self.data.split_to(n))
    }

    /// Consume everything that is left
    pub fn read_rest(&mut self) -> Bytes {
        self.data.split_off(0)
    }
}

impl From<&[u8]> for ByteCursor {
    fn from(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }
}

impl From<Vec<u8>> for ByteCursor {
    fn from(data: Vec<u8>) -> Self {
        Self::new(Bytes::from(data))
    }
}
