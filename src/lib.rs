//! Libris application library
//!
//! Book and user catalogs stored as flat binary record files, plus the
//! modules that wire them into the kernel lifecycle.

pub mod error;
pub mod modules;
pub mod utils;

pub use error::CatalogError;
/// Re-export commonly used types
pub use modules::*;
