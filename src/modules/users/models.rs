use libris_store::{DecodeError, Record, RecordReader, RecordWriter, StoreError};
use serde::Serialize;

/// A registered account. The password is kept and compared as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl User {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// On disk: `text email | text password`.
impl Record for User {
    fn encode(&self, writer: &mut RecordWriter) -> Result<(), StoreError> {
        writer.write_text(&self.email)?;
        writer.write_text(&self.password)
    }

    fn decode(reader: &mut RecordReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            email: reader.read_text()?,
            password: reader.read_text()?,
        })
    }
}
