// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Record Codec
//!
//! Minimal binary records used by the invitation protocol. Only two record
//! types travel on an invitation connection: raw byte strings (commitments and
//! public keys) and booleans (confirmation results).
//!
//! Format:
//! - raw:  `[0x51] [length: 4 bytes big-endian] [bytes]`
//! - bool: `[0x00]` (false) or `[0x01]` (true)

use std::io::{self, Read, Write};

use thiserror::Error;

/// Tag byte for a `false` boolean record.
pub const TAG_FALSE: u8 = 0x00;

/// Tag byte for a `true` boolean record.
pub const TAG_TRUE: u8 = 0x01;

/// Tag byte for a raw byte-string record.
pub const TAG_RAW: u8 = 0x51;

/// Raw header size (tag + 4 bytes length prefix).
pub const RAW_HEADER_SIZE: usize = 5;

/// Codec error types.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Unexpected record tag: 0x{0:02x}")]
    UnexpectedTag(u8),

    #[error("Record too long: {length} bytes (max {max})")]
    TooLong { length: usize, max: usize },

    #[error("Connection closed mid-record")]
    Truncated,
}

/// Writes invitation records to any byte sink.
pub trait RecordWriteExt: Write {
    /// Writes a raw byte-string record.
    fn write_raw(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        let length = u32::try_from(bytes.len()).map_err(|_| CodecError::TooLong {
            length: bytes.len(),
            max: u32::MAX as usize,
        })?;

        let mut record = Vec::with_capacity(RAW_HEADER_SIZE + bytes.len());
        record.push(TAG_RAW);
        record.extend_from_slice(&length.to_be_bytes());
        record.extend_from_slice(bytes);

        self.write_all(&record)?;
        Ok(())
    }

    /// Writes a boolean record.
    fn write_bool(&mut self, value: bool) -> Result<(), CodecError> {
        self.write_all(&[if value { TAG_TRUE } else { TAG_FALSE }])?;
        Ok(())
    }
}

impl<W: Write + ?Sized> RecordWriteExt for W {}

/// Reads invitation records from any byte source.
pub trait RecordReadExt: Read {
    /// Reads a raw byte-string record of at most `max_len` bytes.
    ///
    /// The length prefix is checked before any payload is buffered, so a
    /// hostile peer cannot make us allocate more than `max_len` bytes.
    fn read_raw(&mut self, max_len: usize) -> Result<Vec<u8>, CodecError> {
        let tag = read_tag(self)?;
        if tag != TAG_RAW {
            return Err(CodecError::UnexpectedTag(tag));
        }

        let mut length_bytes = [0u8; 4];
        read_exact_or_truncated(self, &mut length_bytes)?;
        let length = u32::from_be_bytes(length_bytes) as usize;
        if length > max_len {
            return Err(CodecError::TooLong {
                length,
                max: max_len,
            });
        }

        let mut bytes = vec![0u8; length];
        read_exact_or_truncated(self, &mut bytes)?;
        Ok(bytes)
    }

    /// Reads a boolean record.
    fn read_bool(&mut self) -> Result<bool, CodecError> {
        match read_tag(self)? {
            TAG_FALSE => Ok(false),
            TAG_TRUE => Ok(true),
            other => Err(CodecError::UnexpectedTag(other)),
        }
    }
}

impl<R: Read + ?Sized> RecordReadExt for R {}

fn read_tag<R: Read + ?Sized>(reader: &mut R) -> Result<u8, CodecError> {
    let mut tag = [0u8; 1];
    read_exact_or_truncated(reader, &mut tag)?;
    Ok(tag[0])
}

fn read_exact_or_truncated<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
) -> Result<(), CodecError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => CodecError::Truncated,
        _ => CodecError::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_raw_record_layout() {
        let mut buf = Vec::new();
        buf.write_raw(&[0xAA, 0xBB]).unwrap();

        assert_eq!(buf, vec![TAG_RAW, 0, 0, 0, 2, 0xAA, 0xBB]);
    }

    #[test]
    fn test_read_raw_rejects_oversized_length_before_allocating() {
        let mut data = vec![TAG_RAW];
        data.extend_from_slice(&u32::MAX.to_be_bytes());
        let mut cursor = Cursor::new(data);

        let result = cursor.read_raw(32);
        assert!(matches!(
            result,
            Err(CodecError::TooLong { max: 32, .. })
        ));
    }

    #[test]
    fn test_read_bool_rejects_unknown_tag() {
        let mut cursor = Cursor::new(vec![0x07]);
        assert!(matches!(
            cursor.read_bool(),
            Err(CodecError::UnexpectedTag(0x07))
        ));
    }

    #[test]
    fn test_read_raw_rejects_bool_record() {
        let mut cursor = Cursor::new(vec![TAG_TRUE]);
        assert!(matches!(
            cursor.read_raw(32),
            Err(CodecError::UnexpectedTag(TAG_TRUE))
        ));
    }

    #[test]
    fn test_truncated_record() {
        let mut cursor = Cursor::new(vec![TAG_RAW, 0, 0, 0, 4, 1, 2]);
        assert!(matches!(cursor.read_raw(32), Err(CodecError::Truncated)));

        let mut empty = Cursor::new(Vec::<u8>::new());
        assert!(matches!(empty.read_bool(), Err(CodecError::Truncated)));
    }

    #[test]
    fn test_records_read_in_sequence() {
        let mut buf = Vec::new();
        buf.write_raw(b"commitment").unwrap();
        buf.write_bool(true).unwrap();
        buf.write_raw(&[]).unwrap();
        buf.write_bool(false).unwrap();

        let mut cursor = Cursor::new(buf);
        assert_eq!(cursor.read_raw(64).unwrap(), b"commitment");
        assert!(cursor.read_bool().unwrap());
        assert!(cursor.read_raw(64).unwrap().is_empty());
        assert!(!cursor.read_bool().unwrap());
    }
}
