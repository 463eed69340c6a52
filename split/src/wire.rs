//! A small self-describing binary format for named, typed fields.
//!
//! Every field is stored as a one byte name length, the UTF-8 name, a one byte type code and the
//! little endian value. Readers request fields by name in the order they were written, so a
//! renamed, reordered or retyped field is detected instead of being misread.
use crate::DecodeError;

/// Type code of a signed 32-bit integer field.
pub const INT32: u8 = 0x04;

/// Appends named fields to a byte buffer.
#[derive(Debug)]
pub struct WireOut<'a> {
    buf: &'a mut Vec<u8>,
}

impl<'a> WireOut<'a> {
    /// Creates a writer appending to `buf`.
    pub fn new(buf: &'a mut Vec<u8>) -> Self {
        Self { buf }
    }

    fn write_header(&mut self, name: &str, type_code: u8) {
        let len = u8::try_from(name.len()).expect("field name longer than 255 bytes");
        self.buf.push(len);
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.push(type_code);
    }

    /// Writes a signed 32-bit integer field.
    pub fn write_i32(&mut self, name: &str, value: i32) -> &mut Self {
        self.write_header(name, INT32);
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }
}

/// Reads named fields from a byte slice.
#[derive(Debug)]
pub struct WireIn<'a> {
    data: &'a [u8],
}

impl<'a> WireIn<'a> {
    /// Creates a reader over `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn take(&mut self, len: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
        if self.data.len() < len {
            return Err(DecodeError::Truncated { field });
        }
        let (head, rest) = self.data.split_at(len);
        self.data = rest;
        Ok(head)
    }

    fn read_header(&mut self, field: &'static str, type_code: u8) -> Result<(), DecodeError> {
        let Some((&len, rest)) = self.data.split_first() else {
            return Err(DecodeError::MissingField { field });
        };
        self.data = rest;
        let name = self.take(len as usize, field)?;
        if name != field.as_bytes() {
            return Err(DecodeError::UnexpectedField {
                expected: field,
                found: String::from_utf8_lossy(name).into_owned(),
            });
        }
        let found = self.take(1, field)?[0];
        if found != type_code {
            return Err(DecodeError::UnexpectedType {
                field,
                expected: type_code,
                found,
            });
        }
        Ok(())
    }

    /// Reads the next field, which must be a signed 32-bit integer called `field`.
    pub fn read_i32(&mut self, field: &'static str) -> Result<i32, DecodeError> {
        self.read_header(field, INT32)?;
        let bytes = self.take(4, field)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Checks that every byte of the input was consumed.
    pub fn finish(self) -> Result<(), DecodeError> {
        if self.data.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::TrailingBytes(self.data.len()))
        }
    }
}
