//! File-backed sequential record collection.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::codec::{Record, RecordReader, RecordWriter};
use crate::error::StoreError;

/// A file holding a sequence of `R` records.
///
/// Every call opens the file, does its work and closes it again; no handle
/// is held between calls. There is no locking, so only one process should
/// use a given file at a time.
pub struct RecordFile<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RecordFile<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode every record in the file, in file order.
    ///
    /// A missing file is an empty collection. A file that ends in the
    /// middle of a record fails the whole load.
    pub fn load_all(&self) -> Result<Vec<R>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "record file absent, loading nothing");
                return Ok(Vec::new());
            }
            Err(source) => return Err(self.io_error(source)),
        };

        let mut reader = RecordReader::new(&bytes);
        let mut records = Vec::new();
        while !reader.is_at_end() {
            let offset = reader.position();
            let record = R::decode(&mut reader).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                offset,
                source,
            })?;
            records.push(record);
        }

        tracing::debug!(
            path = %self.path.display(),
            count = records.len(),
            bytes = bytes.len(),
            "loaded records"
        );
        Ok(records)
    }

    /// Append one record, creating the file if needed.
    ///
    /// Existing records are not read.
    pub fn append_one(&self, record: &R) -> Result<(), StoreError> {
        let mut writer = RecordWriter::new();
        record.encode(&mut writer)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        file.write_all(writer.as_bytes())
            .map_err(|source| self.io_error(source))?;

        tracing::debug!(path = %self.path.display(), "appended record");
        Ok(())
    }

    /// Replace the file contents with `records`, in order.
    ///
    /// All records are encoded before the file is touched, so an encode
    /// failure leaves the file as it was. The truncate and write are not
    /// atomic: a crash in between loses the file contents.
    pub fn rewrite_all(&self, records: &[R]) -> Result<(), StoreError> {
        let mut writer = RecordWriter::new();
        for record in records {
            record.encode(&mut writer)?;
        }

        fs::write(&self.path, writer.into_bytes()).map_err(|source| self.io_error(source))?;

        tracing::debug!(
            path = %self.path.display(),
            count = records.len(),
            "rewrote record file"
        );
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl<R> Clone for RecordFile<R> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _record: PhantomData,
        }
    }
}

impl<R> fmt::Debug for RecordFile<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordFile")
            .field("path", &self.path)
            .finish()
    }
}
