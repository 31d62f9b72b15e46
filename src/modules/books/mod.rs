pub mod models;
pub mod repository;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use libris_kernel::{InitCtx, Module};

pub use models::{Book, BookFilter};
pub use repository::BookRepository;

use crate::utils;

/// Books module: owns the book record file
pub struct BooksModule {
    repository: BookRepository,
}

impl BooksModule {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            repository: BookRepository::new(path),
        }
    }

    pub fn repository(&self) -> &BookRepository {
        &self.repository
    }
}

impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    /// Prepares the data directory and reads the catalog once so a corrupt
    /// file is reported before any command runs.
    fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let path = self.repository.path();
        utils::ensure_parent_dir(path)?;

        let count = self
            .repository
            .all()
            .with_context(|| format!("failed to read book catalog {}", path.display()))?
            .len();

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            path = %path.display(),
            books = count,
            "books module initialized"
        );
        Ok(())
    }

    fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(path: &Path) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(path))
}
