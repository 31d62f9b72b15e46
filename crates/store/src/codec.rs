//! Field codec shared by every record type.
//!
//! Layout rules:
//! - `i32` is 4 bytes, big-endian
//! - text is a `u16` big-endian byte length followed by that many UTF-8 bytes
//! - `bool` is one byte; `0` decodes as false, anything else as true
//!
//! There is no padding, framing or versioning. A record decodes by reading
//! its fields back in the order they were written.

use crate::error::{DecodeError, StoreError};

/// Longest text field, in bytes, that fits the length prefix.
pub const MAX_TEXT_LEN: usize = u16::MAX as usize;

/// A fixed-shape value that can be stored in a [`crate::RecordFile`].
pub trait Record: Sized {
    /// Append this record's fields to `writer`.
    fn encode(&self, writer: &mut RecordWriter) -> Result<(), StoreError>;

    /// Read exactly one record's fields from `reader`.
    fn decode(reader: &mut RecordReader<'_>) -> Result<Self, DecodeError>;
}

/// Growable output buffer for encoded records.
#[derive(Debug, Default)]
pub struct RecordWriter {
    buf: Vec<u8>,
}

impl RecordWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    /// Write a length-prefixed UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TextTooLong`] when `value` is longer than
    /// [`MAX_TEXT_LEN`] bytes; nothing is written in that case.
    pub fn write_text(&mut self, value: &str) -> Result<(), StoreError> {
        let len = u16::try_from(value.len())
            .map_err(|_| StoreError::TextTooLong { len: value.len() })?;
        self.buf.extend_from_slice(&len.to_be_bytes());
        self.buf.extend_from_slice(value.as_bytes());
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over an encoded byte buffer.
#[derive(Debug)]
pub struct RecordReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> RecordReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Byte offset of the next unread field.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        self.take_array().map(i32::from_be_bytes)
    }

    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        let [byte] = self.take_array::<1>()?;
        Ok(byte != 0)
    }

    pub fn read_text(&mut self) -> Result<String, DecodeError> {
        let len = u16::from_be_bytes(self.take_array()?);
        let bytes = self.take(usize::from(len))?;
        Ok(std::str::from_utf8(bytes)?.to_owned())
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.buf.len().saturating_sub(self.pos);
        if needed > remaining {
            return Err(DecodeError::UnexpectedEof { needed, remaining });
        }
        let buf = self.buf;
        let start = self.pos;
        self.pos += needed;
        Ok(&buf[start..self.pos])
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Entry {
        id: i32,
        label: String,
        flag: bool,
    }

    impl Record for Entry {
        fn encode(&self, writer: &mut RecordWriter) -> Result<(), StoreError> {
            writer.write_i32(self.id);
            writer.write_text(&self.label)?;
            writer.write_bool(self.flag);
            Ok(())
        }

        fn decode(reader: &mut RecordReader<'_>) -> Result<Self, DecodeError> {
            Ok(Self {
                id: reader.read_i32()?,
                label: reader.read_text()?,
                flag: reader.read_bool()?,
            })
        }
    }

    #[test]
    fn layout_is_big_endian_with_u16_text_prefix() {
        let mut writer = RecordWriter::new();
        Entry {
            id: 258,
            label: "ab".to_string(),
            flag: true,
        }
        .encode(&mut writer)
        .unwrap();

        assert_eq!(writer.as_bytes(), &[0, 0, 1, 2, 0, 2, b'a', b'b', 1]);
    }

    #[test]
    fn multibyte_text_survives_encode_and_decode() {
        let original = Entry {
            id: -7,
            label: "Kürk Mantolu Madonna 📚".to_string(),
            flag: false,
        };
        let mut writer = RecordWriter::new();
        original.encode(&mut writer).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = RecordReader::new(&bytes);
        let decoded = Entry::decode(&mut reader).unwrap();
        assert_eq!(decoded, original);
        assert!(reader.is_at_end());
    }

    #[test]
    fn truncated_field_reports_missing_bytes() {
        let mut reader = RecordReader::new(&[0, 0, 0, 1, 0, 5, b'x']);
        assert_eq!(reader.read_i32().unwrap(), 1);
        assert_eq!(
            reader.read_text(),
            Err(DecodeError::UnexpectedEof {
                needed: 5,
                remaining: 1
            })
        );
    }

    #[test]
    fn any_nonzero_byte_decodes_as_true() {
        let mut reader = RecordReader::new(&[0, 1, 0x7f]);
        assert!(!reader.read_bool().unwrap());
        assert!(reader.read_bool().unwrap());
        assert!(reader.read_bool().unwrap());
        assert!(reader.read_bool().is_err());
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut reader = RecordReader::new(&[0, 2, 0xc3, 0x28]);
        assert!(matches!(
            reader.read_text(),
            Err(DecodeError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn overlong_text_is_refused_without_writing() {
        let mut writer = RecordWriter::new();
        let long = "x".repeat(MAX_TEXT_LEN + 1);

        let err = writer.write_text(&long).unwrap_err();
        assert!(matches!(err, StoreError::TextTooLong { len } if len == MAX_TEXT_LEN + 1));
        assert!(writer.as_bytes().is_empty());

        writer.write_text(&long[..MAX_TEXT_LEN]).unwrap();
        assert_eq!(writer.as_bytes().len(), MAX_TEXT_LEN + 2);
    }

    #[test]
    fn overlong_text_message_names_the_limit() {
        let err = RecordWriter::new()
            .write_text(&"x".repeat(MAX_TEXT_LEN + 1))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "text field of {} bytes exceeds the {} byte limit",
                MAX_TEXT_LEN + 1,
                MAX_TEXT_LEN
            )
        );
    }
}
