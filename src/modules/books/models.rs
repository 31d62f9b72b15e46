use libris_store::{DecodeError, Record, RecordReader, RecordWriter, StoreError};
use serde::Serialize;

/// A book in the personal catalog.
///
/// `id` is assigned at creation as the number of books already stored plus
/// one. It is not renumbered when other books are deleted, so it is not
/// guaranteed unique after a delete followed by an add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: i32,
    pub name: String,
    /// Marked as read in the reading tracker
    pub is_read: bool,
    pub is_wishlisted: bool,
    /// Currently borrowed
    pub is_loaned: bool,
}

impl Book {
    /// A freshly catalogued book: unread, not wishlisted, not loaned.
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_read: false,
            is_wishlisted: false,
            is_loaned: false,
        }
    }
}

/// On disk: `i32 id | text name | bool read | bool wishlisted | bool loaned`.
impl Record for Book {
    fn encode(&self, writer: &mut RecordWriter) -> Result<(), StoreError> {
        writer.write_i32(self.id);
        writer.write_text(&self.name)?;
        writer.write_bool(self.is_read);
        writer.write_bool(self.is_wishlisted);
        writer.write_bool(self.is_loaned);
        Ok(())
    }

    fn decode(reader: &mut RecordReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            id: reader.read_i32()?,
            name: reader.read_text()?,
            is_read: reader.read_bool()?,
            is_wishlisted: reader.read_bool()?,
            is_loaned: reader.read_bool()?,
        })
    }
}

/// Selection applied by catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookFilter {
    #[default]
    All,
    Loaned,
    Unloaned,
    Wishlisted,
    Unwishlisted,
    Read,
    Unread,
}

impl BookFilter {
    pub fn matches(self, book: &Book) -> bool {
        match self {
            BookFilter::All => true,
            BookFilter::Loaned => book.is_loaned,
            BookFilter::Unloaned => !book.is_loaned,
            BookFilter::Wishlisted => book.is_wishlisted,
            BookFilter::Unwishlisted => !book.is_wishlisted,
            BookFilter::Read => book.is_read,
            BookFilter::Unread => !book.is_read,
        }
    }
}
