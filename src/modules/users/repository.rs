use std::path::{Path, PathBuf};

use libris_store::RecordFile;

use super::models::User;
use crate::error::CatalogError;

/// Registered users backed by one record file. Append-only.
#[derive(Debug, Clone)]
pub struct UserRepository {
    file: RecordFile<User>,
}

impl UserRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: RecordFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Append a user. The same email may be registered more than once.
    pub fn register(&self, email: &str, password: &str) -> Result<User, CatalogError> {
        let user = User::new(email, password);
        self.file.append_one(&user)?;
        tracing::info!(email = %user.email, "user registered");
        Ok(user)
    }

    /// First user whose email and password both match exactly.
    pub fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, CatalogError> {
        let found = self
            .file
            .load_all()?
            .into_iter()
            .find(|user| user.email == email && user.password == password);

        tracing::info!(email, found = found.is_some(), "credential lookup");
        Ok(found)
    }

    pub fn all(&self) -> Result<Vec<User>, CatalogError> {
        Ok(self.file.load_all()?)
    }
}
