pub mod books;
pub mod users;

use std::path::Path;

use libris_kernel::ModuleRegistry;

/// Register all catalog modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, books_path: &Path, users_path: &Path) {
    registry.register(books::create_module(books_path));
    registry.register(users::create_module(users_path));
}
