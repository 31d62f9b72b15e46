use libris_app::books::BookRepository;
use libris_app::CatalogError;

/// A single-book change requested by id, shared by subcommands and the
/// interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookAction {
    Delete,
    Rename(String),
    Borrow,
    GiveBack,
    Wishlist,
    Unwishlist,
    MarkRead,
}

impl BookAction {
    /// Returns whether the book was found in a state the action applies to.
    pub fn apply(&self, books: &BookRepository, id: i32) -> Result<bool, CatalogError> {
        match self {
            BookAction::Delete => books.delete(id),
            BookAction::Rename(name) => books.update_name(id, name),
            BookAction::Borrow => books.borrow(id),
            BookAction::GiveBack => books.give_back(id),
            BookAction::Wishlist => books.set_wishlisted(id, true),
            BookAction::Unwishlist => books.set_wishlisted(id, false),
            BookAction::MarkRead => books.set_read(id, true),
        }
    }

    pub fn report(&self, id: i32, found: bool) -> String {
        match (self, found) {
            (BookAction::Delete, true) => {
                format!("Book with ID '{id}' has been deleted successfully.")
            }
            (BookAction::Rename(_), true) => {
                format!("Book with ID '{id}' has been updated successfully.")
            }
            (BookAction::Rename(_), false) => "There is no book with the specified ID.".to_string(),
            (BookAction::Borrow, true) => "Book borrowed successfully.".to_string(),
            (BookAction::GiveBack, true) => "Book returned successfully.".to_string(),
            (BookAction::Delete | BookAction::Borrow | BookAction::GiveBack, false) => {
                "There is no book you want!".to_string()
            }
            (BookAction::Wishlist, true) => {
                format!("Book with ID '{id}' has been added to your wishlist.")
            }
            (BookAction::Unwishlist, true) => {
                format!("Book with ID '{id}' has been removed from your wishlist.")
            }
            (BookAction::Unwishlist, false) => {
                format!("There is no wishlisted book with ID '{id}'.")
            }
            (BookAction::MarkRead, true) => {
                format!("Book with ID '{id}' has been marked as read successfully.")
            }
            (BookAction::Wishlist | BookAction::MarkRead, false) => {
                format!("There is no book with ID '{id}'.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn borrow_reports_second_attempt_as_missing() {
        let dir = TempDir::new().unwrap();
        let books = BookRepository::new(dir.path().join("books.bin"));
        books.add("A").unwrap();

        let first = BookAction::Borrow.apply(&books, 1).unwrap();
        let second = BookAction::Borrow.apply(&books, 1).unwrap();

        assert_eq!(BookAction::Borrow.report(1, first), "Book borrowed successfully.");
        assert_eq!(BookAction::Borrow.report(1, second), "There is no book you want!");
    }

    #[test]
    fn rename_carries_the_new_name() {
        let dir = TempDir::new().unwrap();
        let books = BookRepository::new(dir.path().join("books.bin"));
        books.add("A").unwrap();

        let action = BookAction::Rename("Anathem".to_string());
        assert!(action.apply(&books, 1).unwrap());
        assert_eq!(books.all().unwrap()[0].name, "Anathem");
        assert_eq!(
            action.report(7, false),
            "There is no book with the specified ID."
        );
    }
}
