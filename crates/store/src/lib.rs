//! Flat binary record files.
//!
//! A record file is a headerless sequence of fixed-shape records, each
//! encoded field by field through [`codec::Record`]. End of file is the only
//! terminator. The file supports three operations: load everything, append
//! one record, and rewrite everything. Any change to an existing record is
//! expressed as load, transform in memory, rewrite.

pub mod codec;
pub mod error;
pub mod store;

pub use codec::{Record, RecordReader, RecordWriter};
pub use error::{DecodeError, StoreError};
pub use store::RecordFile;
