pub mod models;
pub mod repository;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use libris_kernel::{InitCtx, Module};

pub use models::User;
pub use repository::UserRepository;

use crate::utils;

/// Users module: owns the user record file
pub struct UsersModule {
    repository: UserRepository,
}

impl UsersModule {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            repository: UserRepository::new(path),
        }
    }

    pub fn repository(&self) -> &UserRepository {
        &self.repository
    }
}

impl Module for UsersModule {
    fn name(&self) -> &'static str {
        "users"
    }

    fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let path = self.repository.path();
        utils::ensure_parent_dir(path)?;

        let count = self
            .repository
            .all()
            .with_context(|| format!("failed to read user file {}", path.display()))?
            .len();

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            path = %path.display(),
            users = count,
            "users module initialized"
        );
        Ok(())
    }

    fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "users module stopped");
        Ok(())
    }
}

/// Create a new instance of the users module
pub fn create_module(path: &Path) -> Arc<dyn Module> {
    Arc::new(UsersModule::new(path))
}
