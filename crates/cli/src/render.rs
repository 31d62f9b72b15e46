use std::io::Write;

use libris_app::books::{Book, BookFilter};

/// `"{id}. {name} (Read : Wishlist)"`
pub fn book_line(book: &Book) -> String {
    let read = if book.is_read { "Read" } else { "Unread" };
    let wishlist = if book.is_wishlisted {
        "Wishlist"
    } else {
        "UnWishlisted"
    };
    format!("{}. {} ({} : {})", book.id, book.name, read, wishlist)
}

/// Message shown when a listing comes back empty.
pub fn empty_message(filter: BookFilter) -> &'static str {
    match filter {
        BookFilter::All => "There are no books.",
        BookFilter::Loaned => "There are no books to give back.",
        BookFilter::Unloaned => "There are no books to borrow.",
        BookFilter::Wishlisted => "You bought all the books on your wish list.",
        BookFilter::Unwishlisted => "All books are on the wish list.",
        BookFilter::Read => "There are no marked books.",
        BookFilter::Unread => "There are no unmarked books.",
    }
}

/// Print one line per book, or the filter's empty message.
/// Returns whether any book was printed.
pub fn write_books(out: &mut impl Write, books: &[Book], filter: BookFilter) -> anyhow::Result<bool> {
    if books.is_empty() {
        writeln!(out, "{}", empty_message(filter))?;
        return Ok(false);
    }
    for book in books {
        writeln!(out, "{}", book_line(book))?;
    }
    Ok(true)
}

pub fn write_books_json(out: &mut impl Write, books: &[Book]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, books)?;
    writeln!(out)?;
    Ok(())
}
