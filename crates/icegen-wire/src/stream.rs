//! Output and input byte streams.
//!
//! Layout rules:
//! - primitives are little-endian; `bool` is one byte
//! - sizes below 255 take one byte, larger sizes are `255` followed by an `i32`
//! - a slice is an `i32` length (counting itself) followed by its content
//! - an encapsulation is an `i32` length (counting itself), the encoding
//!   version, then its content
//! - type ids are compressed per stream: the first occurrence is written as
//!   `false` + string, later ones as `true` + index

use std::collections::HashMap;

use crate::DecodeError;

pub const ENCODING_MAJOR: u8 = 1;
pub const ENCODING_MINOR: u8 = 0;

/// Identity carried by a proxy on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Identity {
    pub name: String,
    pub category: String,
}

impl Identity {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            category: String::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct OutputStream {
    buf: Vec<u8>,
    /// Offsets of length placeholders for open slices.
    slices: Vec<usize>,
    /// Offsets of length placeholders for open encapsulations.
    encaps: Vec<usize>,
    type_ids: HashMap<String, usize>,
}

impl OutputStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn finished(self) -> Vec<u8> {
        self.buf
    }

    /// Drop all content and per-stream state.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.slices.clear();
        self.encaps.clear();
        self.type_ids.clear();
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(v as u8);
    }

    pub fn write_byte(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_short(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_int(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_long(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_float(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_double(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_size(&mut self, v: usize) {
        if v < 255 {
            self.buf.push(v as u8);
        } else {
            self.buf.push(255);
            self.write_int(v as i32);
        }
    }

    pub fn write_string(&mut self, v: &str) {
        self.write_size(v.len());
        self.buf.extend_from_slice(v.as_bytes());
    }

    pub fn write_string_seq(&mut self, v: &[String]) {
        self.write_size(v.len());
        for s in v {
            self.write_string(s);
        }
    }

    pub fn write_type_id(&mut self, id: &str) {
        if let Some(&index) = self.type_ids.get(id) {
            self.write_bool(true);
            self.write_size(index);
        } else {
            let index = self.type_ids.len();
            self.type_ids.insert(id.to_owned(), index);
            self.write_bool(false);
            self.write_string(id);
        }
    }

    /// Nullable proxy: a null proxy is written as an empty identity.
    pub fn write_proxy(&mut self, v: Option<&Identity>) {
        match v {
            Some(id) => {
                self.write_string(&id.name);
                self.write_string(&id.category);
            }
            None => {
                self.write_string("");
                self.write_string("");
            }
        }
    }

    pub fn start_write_slice(&mut self) {
        self.slices.push(self.buf.len());
        self.write_int(0);
    }

    pub fn end_write_slice(&mut self) {
        if let Some(start) = self.slices.pop() {
            self.patch_length(start);
        }
    }

    pub fn start_write_encaps(&mut self) {
        self.encaps.push(self.buf.len());
        self.write_int(0);
        self.write_byte(ENCODING_MAJOR);
        self.write_byte(ENCODING_MINOR);
    }

    pub fn end_write_encaps(&mut self) {
        if let Some(start) = self.encaps.pop() {
            self.patch_length(start);
        }
    }

    fn patch_length(&mut self, start: usize) {
        let len = (self.buf.len() - start) as i32;
        self.buf[start..start + 4].copy_from_slice(&len.to_le_bytes());
    }
}

#[derive(Debug)]
pub struct InputStream<'a> {
    data: &'a [u8],
    pos: usize,
    /// End offsets of open slices.
    slices: Vec<usize>,
    /// End offsets of open encapsulations.
    encaps: Vec<usize>,
    type_ids: Vec<String>,
}

impl<'a> InputStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            slices: Vec::new(),
            encaps: Vec::new(),
            type_ids: Vec::new(),
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::Truncated {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let data = self.data;
        let bytes = &data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.read_byte()? != 0)
    }

    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_short(&mut self) -> Result<i16, DecodeError> {
        Ok(i16::from_le_bytes(self.take_array()?))
    }

    pub fn read_int(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    pub fn read_long(&mut self) -> Result<i64, DecodeError> {
        Ok(i64::from_le_bytes(self.take_array()?))
    }

    pub fn read_float(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    pub fn read_double(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_le_bytes(self.take_array()?))
    }

    pub fn read_size(&mut self) -> Result<usize, DecodeError> {
        let b = self.read_byte()?;
        if b < 255 {
            return Ok(b as usize);
        }
        let v = self.read_int()?;
        if v < 0 {
            return Err(DecodeError::NegativeSize(v));
        }
        Ok(v as usize)
    }

    /// Read a sequence size and check that `min_elem_size` bytes per element
    /// are actually available, so a corrupt size cannot force a huge
    /// allocation.
    pub fn read_and_check_seq_size(&mut self, min_elem_size: usize) -> Result<usize, DecodeError> {
        let n = self.read_size()?;
        let needed = n.saturating_mul(min_elem_size);
        if needed > self.remaining() {
            return Err(DecodeError::Truncated {
                needed,
                remaining: self.remaining(),
            });
        }
        Ok(n)
    }

    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        let n = self.read_size()?;
        let bytes = self.take(n)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| DecodeError::InvalidUtf8)
    }

    pub fn read_string_seq(&mut self) -> Result<Vec<String>, DecodeError> {
        let n = self.read_and_check_seq_size(1)?;
        (0..n).map(|_| self.read_string()).collect()
    }

    pub fn read_type_id(&mut self) -> Result<String, DecodeError> {
        if self.read_bool()? {
            let index = self.read_size()?;
            self.type_ids
                .get(index)
                .cloned()
                .ok_or(DecodeError::UnknownTypeIdIndex(index))
        } else {
            let id = self.read_string()?;
            self.type_ids.push(id.clone());
            Ok(id)
        }
    }

    /// Nullable proxy; an empty identity name decodes as `None`.
    pub fn read_proxy(&mut self) -> Result<Option<Identity>, DecodeError> {
        let name = self.read_string()?;
        let category = self.read_string()?;
        if name.is_empty() {
            return Ok(None);
        }
        Ok(Some(Identity { name, category }))
    }

    fn read_length_prefix(&mut self) -> Result<usize, DecodeError> {
        let start = self.pos;
        let len = self.read_int()?;
        if len < 4 {
            return Err(DecodeError::NegativeSize(len));
        }
        let end = start + len as usize;
        if end > self.data.len() {
            return Err(DecodeError::Truncated {
                needed: len as usize - 4,
                remaining: self.remaining(),
            });
        }
        Ok(end)
    }

    pub fn start_read_slice(&mut self) -> Result<(), DecodeError> {
        let end = self.read_length_prefix()?;
        self.slices.push(end);
        Ok(())
    }

    /// Close a slice, skipping any trailing bytes this reader does not know.
    pub fn end_read_slice(&mut self) -> Result<(), DecodeError> {
        let Some(end) = self.slices.pop() else {
            return Ok(());
        };
        if self.pos > end {
            return Err(DecodeError::SliceOverrun);
        }
        self.pos = end;
        Ok(())
    }

    /// End offset of the innermost open slice.
    pub fn slice_end(&self) -> Option<usize> {
        self.slices.last().copied()
    }

    /// Skip a whole slice of an unknown type.
    pub fn skip_slice(&mut self) -> Result<(), DecodeError> {
        self.pos = self.read_length_prefix()?;
        Ok(())
    }

    pub fn start_read_encaps(&mut self) -> Result<(), DecodeError> {
        let end = self.read_length_prefix()?;
        let major = self.read_byte()?;
        let minor = self.read_byte()?;
        if major != ENCODING_MAJOR || minor > ENCODING_MINOR {
            return Err(DecodeError::UnsupportedEncoding { major, minor });
        }
        self.encaps.push(end);
        Ok(())
    }

    pub fn end_read_encaps(&mut self) -> Result<(), DecodeError> {
        let Some(end) = self.encaps.pop() else {
            return Ok(());
        };
        if self.pos > end {
            return Err(DecodeError::SliceOverrun);
        }
        self.pos = end;
        Ok(())
    }
}
