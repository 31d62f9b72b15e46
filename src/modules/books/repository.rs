use std::path::{Path, PathBuf};

use libris_store::RecordFile;

use super::models::{Book, BookFilter};
use crate::error::CatalogError;

/// Boolean fields that change through a guarded transition.
#[derive(Debug, Clone, Copy)]
enum Flag {
    Read,
    Wishlisted,
    Loaned,
}

impl Flag {
    fn slot(self, book: &mut Book) -> &mut bool {
        match self {
            Flag::Read => &mut book.is_read,
            Flag::Wishlisted => &mut book.is_wishlisted,
            Flag::Loaned => &mut book.is_loaned,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Flag::Read => "read",
            Flag::Wishlisted => "wishlisted",
            Flag::Loaned => "loaned",
        }
    }
}

/// Book catalog backed by one record file.
///
/// Every mutation other than [`BookRepository::add`] loads the whole file,
/// changes the in-memory list and rewrites the whole file.
#[derive(Debug, Clone)]
pub struct BookRepository {
    file: RecordFile<Book>,
}

impl BookRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: RecordFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Id the next added book will receive: stored count plus one.
    pub fn next_id(&self) -> Result<i32, CatalogError> {
        let count = self.file.load_all()?.len();
        Self::id_after(count)
    }

    /// Catalogue a new unread, unwishlisted, unloaned book.
    pub fn add(&self, name: &str) -> Result<Book, CatalogError> {
        let book = Book::new(self.next_id()?, name);
        self.file.append_one(&book)?;
        tracing::info!(id = book.id, name = %book.name, "book added");
        Ok(book)
    }

    /// Remove every book carrying `id`. Returns whether anything was removed.
    pub fn delete(&self, id: i32) -> Result<bool, CatalogError> {
        let mut books = self.file.load_all()?;
        let before = books.len();
        books.retain(|book| book.id != id);
        self.file.rewrite_all(&books)?;

        let removed = books.len() != before;
        tracing::info!(id, removed, "book delete");
        Ok(removed)
    }

    /// Rename the book carrying `id`. Returns whether it was found.
    pub fn update_name(&self, id: i32, new_name: &str) -> Result<bool, CatalogError> {
        let mut books = self.file.load_all()?;
        let mut found = false;
        for book in books.iter_mut().filter(|book| book.id == id) {
            book.name = new_name.to_string();
            found = true;
        }
        self.file.rewrite_all(&books)?;

        tracing::info!(id, found, "book rename");
        Ok(found)
    }

    /// Set the loan flag. Only a book whose flag differs from `desired`
    /// changes; returns whether one did.
    pub fn set_loaned(&self, id: i32, desired: bool) -> Result<bool, CatalogError> {
        self.transition(id, Flag::Loaned, desired)
    }

    pub fn borrow(&self, id: i32) -> Result<bool, CatalogError> {
        self.set_loaned(id, true)
    }

    pub fn give_back(&self, id: i32) -> Result<bool, CatalogError> {
        self.set_loaned(id, false)
    }

    /// Set the wishlist flag, with the same transition rule as [`Self::set_loaned`].
    pub fn set_wishlisted(&self, id: i32, desired: bool) -> Result<bool, CatalogError> {
        self.transition(id, Flag::Wishlisted, desired)
    }

    /// Set the read flag, with the same transition rule as [`Self::set_loaned`].
    pub fn set_read(&self, id: i32, desired: bool) -> Result<bool, CatalogError> {
        self.transition(id, Flag::Read, desired)
    }

    /// Books matching `filter`, in file order. Empty means nothing matched.
    pub fn list(&self, filter: BookFilter) -> Result<Vec<Book>, CatalogError> {
        let mut books = self.file.load_all()?;
        books.retain(|book| filter.matches(book));
        Ok(books)
    }

    pub fn all(&self) -> Result<Vec<Book>, CatalogError> {
        self.list(BookFilter::All)
    }

    pub fn loaned(&self) -> Result<Vec<Book>, CatalogError> {
        self.list(BookFilter::Loaned)
    }

    pub fn unloaned(&self) -> Result<Vec<Book>, CatalogError> {
        self.list(BookFilter::Unloaned)
    }

    pub fn wishlisted(&self) -> Result<Vec<Book>, CatalogError> {
        self.list(BookFilter::Wishlisted)
    }

    pub fn unwishlisted(&self) -> Result<Vec<Book>, CatalogError> {
        self.list(BookFilter::Unwishlisted)
    }

    pub fn read(&self) -> Result<Vec<Book>, CatalogError> {
        self.list(BookFilter::Read)
    }

    pub fn unread(&self) -> Result<Vec<Book>, CatalogError> {
        self.list(BookFilter::Unread)
    }

    fn transition(&self, id: i32, flag: Flag, desired: bool) -> Result<bool, CatalogError> {
        let mut books = self.file.load_all()?;
        let mut changed = false;
        for book in books.iter_mut().filter(|book| book.id == id) {
            let slot = flag.slot(book);
            if *slot != desired {
                *slot = desired;
                changed = true;
            }
        }
        self.file.rewrite_all(&books)?;

        tracing::info!(id, flag = flag.as_str(), desired, changed, "book flag transition");
        Ok(changed)
    }

    fn id_after(count: usize) -> Result<i32, CatalogError> {
        i32::try_from(count)
            .ok()
            .and_then(|count| count.checked_add(1))
            .ok_or(CatalogError::IdOverflow { count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libris_store::StoreError;
    use std::fs;
    use tempfile::TempDir;

    fn repository(dir: &TempDir) -> BookRepository {
        BookRepository::new(dir.path().join("books.bin"))
    }

    fn ids(books: &[Book]) -> Vec<i32> {
        books.iter().map(|book| book.id).collect()
    }

    fn seeded(dir: &TempDir, names: &[&str]) -> BookRepository {
        let repo = repository(dir);
        for name in names {
            repo.add(name).unwrap();
        }
        repo
    }

    #[test]
    fn first_book_in_empty_catalog() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);
        assert_eq!(repo.next_id().unwrap(), 1);

        repo.add("Dune").unwrap();

        assert_eq!(repo.all().unwrap(), vec![Book::new(1, "Dune")]);
    }

    #[test]
    fn ids_follow_append_order() {
        let dir = TempDir::new().unwrap();
        let repo = seeded(&dir, &["A", "B", "C", "D"]);

        let books = repo.all().unwrap();
        assert_eq!(ids(&books), [1, 2, 3, 4]);
        let names: Vec<_> = books.iter().map(|book| book.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C", "D"]);
    }

    #[test]
    fn delete_keeps_order_and_untouched_fields() {
        let dir = TempDir::new().unwrap();
        let repo = seeded(&dir, &["A", "B", "C", "D"]);
        repo.set_read(3, true).unwrap();
        repo.borrow(4).unwrap();

        assert!(repo.delete(2).unwrap());

        let books = repo.all().unwrap();
        assert_eq!(ids(&books), [1, 3, 4]);
        assert!(books[1].is_read);
        assert!(books[2].is_loaned);
        assert!(!repo.delete(2).unwrap());
    }

    #[test]
    fn ids_can_repeat_after_delete_then_add() {
        let dir = TempDir::new().unwrap();
        let repo = seeded(&dir, &["A", "B", "C"]);
        repo.delete(1).unwrap();

        let added = repo.add("D").unwrap();

        assert_eq!(added.id, 3);
        assert_eq!(ids(&repo.all().unwrap()), [2, 3, 3]);
    }

    #[test]
    fn update_renames_only_the_match() {
        let dir = TempDir::new().unwrap();
        let repo = seeded(&dir, &["A", "B"]);

        assert!(repo.update_name(2, "Beta").unwrap());
        assert!(!repo.update_name(9, "Ghost").unwrap());

        let names: Vec<_> = repo.all().unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, ["A", "Beta"]);
    }

    #[test]
    fn book_cannot_be_borrowed_twice() {
        let dir = TempDir::new().unwrap();
        let repo = seeded(&dir, &["A"]);

        assert!(repo.set_loaned(1, true).unwrap());
        let after_first = repo.all().unwrap();
        assert!(after_first[0].is_loaned);

        assert!(!repo.set_loaned(1, true).unwrap());
        assert_eq!(repo.all().unwrap(), after_first);
    }

    #[test]
    fn give_back_requires_a_loaned_book() {
        let dir = TempDir::new().unwrap();
        let repo = seeded(&dir, &["A"]);

        assert!(!repo.give_back(1).unwrap());
        assert!(repo.borrow(1).unwrap());
        assert!(repo.give_back(1).unwrap());
        assert!(repo.loaned().unwrap().is_empty());
    }

    #[test]
    fn wishlist_and_read_flags_transition_independently() {
        let dir = TempDir::new().unwrap();
        let repo = seeded(&dir, &["A"]);
        repo.borrow(1).unwrap();

        assert!(repo.set_wishlisted(1, true).unwrap());
        assert!(!repo.set_wishlisted(1, true).unwrap());
        assert!(repo.set_read(1, true).unwrap());
        assert!(!repo.set_read(1, true).unwrap());
        assert!(repo.set_wishlisted(1, false).unwrap());
        assert!(!repo.set_wishlisted(1, false).unwrap());

        let books = repo.all().unwrap();
        let book = &books[0];
        assert!(book.is_read);
        assert!(!book.is_wishlisted);
        assert!(book.is_loaned);
    }

    #[test]
    fn unknown_id_is_not_found_for_every_transition() {
        let dir = TempDir::new().unwrap();
        let repo = seeded(&dir, &["A"]);

        assert!(!repo.borrow(42).unwrap());
        assert!(!repo.set_wishlisted(42, true).unwrap());
        assert!(!repo.set_read(42, true).unwrap());
        assert_eq!(repo.all().unwrap(), vec![Book::new(1, "A")]);
    }

    #[test]
    fn queries_partition_the_catalog() {
        let dir = TempDir::new().unwrap();
        let repo = seeded(&dir, &["A", "B", "C"]);
        repo.borrow(1).unwrap();
        repo.set_wishlisted(2, true).unwrap();
        repo.set_read(3, true).unwrap();

        assert_eq!(ids(&repo.loaned().unwrap()), [1]);
        assert_eq!(ids(&repo.unloaned().unwrap()), [2, 3]);
        assert_eq!(ids(&repo.wishlisted().unwrap()), [2]);
        assert_eq!(ids(&repo.unwishlisted().unwrap()), [1, 3]);
        assert_eq!(ids(&repo.read().unwrap()), [3]);
        assert_eq!(ids(&repo.unread().unwrap()), [1, 2]);
    }

    #[test]
    fn queries_on_missing_file_find_nothing() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);

        assert!(repo.all().unwrap().is_empty());
        assert!(repo.wishlisted().unwrap().is_empty());
        assert!(!repo.path().exists());
    }

    #[test]
    fn corrupt_file_fails_mutations_without_rewriting() {
        let dir = TempDir::new().unwrap();
        let repo = seeded(&dir, &["A"]);
        let mut bytes = fs::read(repo.path()).unwrap();
        bytes.extend_from_slice(&[0, 0, 0, 2, 0]);
        fs::write(repo.path(), &bytes).unwrap();

        let err = repo.borrow(1).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Store(StoreError::Malformed { .. })
        ));
        assert_eq!(fs::read(repo.path()).unwrap(), bytes);
    }

    #[test]
    fn id_overflow_is_reported() {
        assert_eq!(BookRepository::id_after(0).unwrap(), 1);
        assert!(matches!(
            BookRepository::id_after(i32::MAX as usize),
            Err(CatalogError::IdOverflow { .. })
        ));
    }
}
