//! Enum ordinal encoding.
//!
//! The width depends only on the number of enumerators, so writer and reader
//! agree without exchanging anything.

use crate::{DecodeError, InputStream, OutputStream};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnumWidth {
    Byte,
    Short,
    Int,
}

impl EnumWidth {
    pub fn for_count(count: usize) -> Self {
        if count <= 0x7f {
            EnumWidth::Byte
        } else if count <= 0x7fff {
            EnumWidth::Short
        } else {
            EnumWidth::Int
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            EnumWidth::Byte => 1,
            EnumWidth::Short => 2,
            EnumWidth::Int => 4,
        }
    }
}

impl OutputStream {
    pub fn write_enum(&mut self, ordinal: u32, count: usize) {
        match EnumWidth::for_count(count) {
            EnumWidth::Byte => self.write_byte(ordinal as u8),
            EnumWidth::Short => self.write_short(ordinal as i16),
            EnumWidth::Int => self.write_int(ordinal as i32),
        }
    }
}

impl InputStream<'_> {
    /// Read an ordinal, rejecting values outside `[0, count)`.
    pub fn read_enum(&mut self, count: usize) -> Result<u32, DecodeError> {
        let value = match EnumWidth::for_count(count) {
            EnumWidth::Byte => self.read_byte()? as i8 as i64,
            EnumWidth::Short => self.read_short()? as i64,
            EnumWidth::Int => self.read_int()? as i64,
        };
        if value < 0 || value >= count as i64 {
            return Err(DecodeError::EnumOutOfRange { value, count });
        }
        Ok(value as u32)
    }
}
