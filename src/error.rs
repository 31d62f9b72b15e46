use libris_store::StoreError;
use thiserror::Error;

/// Errors returned by the book and user repositories.
///
/// A missing book or a wrong password is not an error; repositories report
/// those as `false` or `None`.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The next id would not fit in the stored 32-bit field.
    #[error("cannot assign a book id after {count} records")]
    IdOverflow { count: usize },
}
