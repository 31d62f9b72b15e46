//! Error types for record files.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while decoding a single record from a byte buffer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer ended in the middle of a field.
    #[error("unexpected end of data: needed {needed} bytes, {remaining} left")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// A text field did not hold valid UTF-8.
    #[error("text is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Errors produced by record file operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be read, created or written.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Decoding stopped mid-record. No partial result is returned.
    #[error("malformed record in {} at byte {offset}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        offset: usize,
        #[source]
        source: DecodeError,
    },

    /// A text field is longer than its length prefix can express.
    #[error("text field of {len} bytes exceeds the {max} byte limit", max = crate::codec::MAX_TEXT_LEN)]
    TextTooLong { len: usize },
}
