//! Project-specific utilities live here.

use std::path::Path;

use anyhow::Context;

/// Creates the directory that will hold `path`, if there is one to create.
pub fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create data directory {}", parent.display())),
        _ => Ok(()),
    }
}
