//! Interactive menu session.
//!
//! Input and output handles are supplied by the caller, so a session can run
//! against stdin/stdout or against in-memory buffers. End of input ends the
//! session from any prompt.

use std::io::{BufRead, Write};

use libris_app::books::{BookFilter, BookRepository};
use libris_app::users::UserRepository;
use libris_app::CatalogError;
use libris_store::codec::MAX_TEXT_LEN;
use libris_store::StoreError;

use crate::actions::BookAction;
use crate::render;

const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

/// Whether the session keeps going after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Result of a menu prompt: a 1-based option, or end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Picked(usize),
    Quit,
}

pub struct Session<'a, R, W> {
    input: R,
    out: W,
    books: &'a BookRepository,
    users: &'a UserRepository,
    clear_screen: bool,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(
        input: R,
        out: W,
        books: &'a BookRepository,
        users: &'a UserRepository,
        clear_screen: bool,
    ) -> Self {
        Self {
            input,
            out,
            books,
            users,
            clear_screen,
        }
    }

    /// Run the main menu until the user exits or input ends.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let flow = match self.choose("Welcome to Library System", &["Login", "Register", "Exit"])? {
                Selection::Picked(1) => self.login()?,
                Selection::Picked(2) => self.register()?,
                _ => Flow::Quit,
            };
            if flow == Flow::Quit {
                tracing::debug!("session ended");
                return Ok(());
            }
        }
    }

    fn login(&mut self) -> anyhow::Result<Flow> {
        self.clear()?;
        let Some(email) = self.prompt("Enter email: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(password) = self.prompt("Enter password: ")? else {
            return Ok(Flow::Quit);
        };

        if self.users.find_by_credentials(&email, &password)?.is_none() {
            writeln!(self.out, "Invalid email or password. Please try again.")?;
            return self.pause();
        }

        writeln!(self.out, "Login successful.")?;
        if self.pause()? == Flow::Quit {
            return Ok(Flow::Quit);
        }
        self.user_operations()
    }

    fn register(&mut self) -> anyhow::Result<Flow> {
        self.clear()?;
        let Some(email) = self.prompt("Enter email: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(password) = self.prompt("Enter password: ")? else {
            return Ok(Flow::Quit);
        };

        if let Err(err) = self.users.register(&email, &password) {
            return self.reject_oversized(err);
        }
        writeln!(self.out, "Registration successful.")?;
        self.pause()
    }

    fn user_operations(&mut self) -> anyhow::Result<Flow> {
        loop {
            let flow = match self.choose(
                "User Operations",
                &[
                    "Book Cataloging",
                    "Loan Management",
                    "WishList",
                    "Reading Tracker",
                    "Logout",
                ],
            )? {
                Selection::Quit => Flow::Quit,
                Selection::Picked(1) => self.book_cataloging()?,
                Selection::Picked(2) => self.loan_management()?,
                Selection::Picked(3) => self.wishlist()?,
                Selection::Picked(4) => self.reading_tracker()?,
                Selection::Picked(_) => return Ok(Flow::Continue),
            };
            if flow == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    fn book_cataloging(&mut self) -> anyhow::Result<Flow> {
        loop {
            let flow = match self.choose(
                "Welcome to Book Operations",
                &[
                    "Add Book",
                    "Delete Book",
                    "Update Book",
                    "View Catalog",
                    "Return User Operations",
                ],
            )? {
                Selection::Quit => Flow::Quit,
                Selection::Picked(1) => self.add_book()?,
                Selection::Picked(2) => self.act_on_book(
                    BookFilter::All,
                    "Enter a number to delete book: ",
                    BookAction::Delete,
                )?,
                Selection::Picked(3) => self.update_book()?,
                Selection::Picked(4) => self.view(BookFilter::All, None)?,
                Selection::Picked(_) => return Ok(Flow::Continue),
            };
            if flow == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    fn loan_management(&mut self) -> anyhow::Result<Flow> {
        loop {
            let flow = match self.choose(
                "Loan Management Menu",
                &[
                    "Give Book",
                    "Borrow Book",
                    "View Borrowed Books",
                    "Return to User Operations Menu",
                ],
            )? {
                Selection::Quit => Flow::Quit,
                Selection::Picked(1) => self.act_on_book(
                    BookFilter::Loaned,
                    "Enter the ID of the book you want to give back: ",
                    BookAction::GiveBack,
                )?,
                Selection::Picked(2) => self.act_on_book(
                    BookFilter::Unloaned,
                    "Enter the ID of the book you want to borrow: ",
                    BookAction::Borrow,
                )?,
                Selection::Picked(3) => self.view(BookFilter::Loaned, None)?,
                Selection::Picked(_) => return Ok(Flow::Continue),
            };
            if flow == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    fn wishlist(&mut self) -> anyhow::Result<Flow> {
        loop {
            let flow = match self.choose(
                "WishList Menu",
                &[
                    "List WishList",
                    "Add to WishList",
                    "Remove from WishList",
                    "Return to User Operations Menu",
                ],
            )? {
                Selection::Quit => Flow::Quit,
                Selection::Picked(1) => self.view(BookFilter::Wishlisted, None)?,
                Selection::Picked(2) => self.act_on_book(
                    BookFilter::Unwishlisted,
                    "Enter the ID of the book you want to add to your wishlist: ",
                    BookAction::Wishlist,
                )?,
                Selection::Picked(3) => self.act_on_book(
                    BookFilter::Wishlisted,
                    "Enter the ID of the book you want to remove from your wishlist: ",
                    BookAction::Unwishlist,
                )?,
                Selection::Picked(_) => return Ok(Flow::Continue),
            };
            if flow == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    fn reading_tracker(&mut self) -> anyhow::Result<Flow> {
        loop {
            let flow = match self.choose(
                "Welcome to ReadingTracker",
                &[
                    "Log Progress",
                    "Mark As Read",
                    "View History",
                    "Return User Operations",
                ],
            )? {
                Selection::Quit => Flow::Quit,
                Selection::Picked(1) => self.view(BookFilter::All, None)?,
                Selection::Picked(2) => self.act_on_book(
                    BookFilter::Unread,
                    "Enter the ID of the book to mark as read: ",
                    BookAction::MarkRead,
                )?,
                Selection::Picked(3) => self.view(BookFilter::Read, Some("Marked Books:"))?,
                Selection::Picked(_) => return Ok(Flow::Continue),
            };
            if flow == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    fn add_book(&mut self) -> anyhow::Result<Flow> {
        self.clear()?;
        let Some(name) = self.prompt("Enter a book name: ")? else {
            return Ok(Flow::Quit);
        };
        let book = match self.books.add(&name) {
            Ok(book) => book,
            Err(err) => return self.reject_oversized(err),
        };
        writeln!(self.out, "Book with ID '{}' has been added.", book.id)?;
        self.pause()
    }

    fn update_book(&mut self) -> anyhow::Result<Flow> {
        self.clear()?;
        let books = self.books.all()?;
        render::write_books(&mut self.out, &books, BookFilter::All)?;
        let Some(raw_id) = self.prompt("Enter a number to update book: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(id) = parse_id(&raw_id) else {
            return self.input_error();
        };
        let Some(name) = self.prompt("Enter the new name for the book: ")? else {
            return Ok(Flow::Quit);
        };

        let action = BookAction::Rename(name);
        let found = match action.apply(self.books, id) {
            Ok(found) => found,
            Err(err) => return self.reject_oversized(err),
        };
        writeln!(self.out, "{}", action.report(id, found))?;
        self.pause()
    }

    /// List the candidates, ask for an id, apply `action` and report.
    fn act_on_book(
        &mut self,
        candidates: BookFilter,
        question: &str,
        action: BookAction,
    ) -> anyhow::Result<Flow> {
        self.clear()?;
        let books = self.books.list(candidates)?;
        render::write_books(&mut self.out, &books, candidates)?;
        let Some(raw_id) = self.prompt(question)? else {
            return Ok(Flow::Quit);
        };
        let Some(id) = parse_id(&raw_id) else {
            return self.input_error();
        };

        let found = action.apply(self.books, id)?;
        writeln!(self.out, "{}", action.report(id, found))?;
        self.pause()
    }

    fn view(&mut self, filter: BookFilter, heading: Option<&str>) -> anyhow::Result<Flow> {
        self.clear()?;
        if let Some(heading) = heading {
            writeln!(self.out, "{heading}")?;
        }
        let books = self.books.list(filter)?;
        render::write_books(&mut self.out, &books, filter)?;
        self.pause()
    }

    /// Show a numbered menu until a valid option is picked.
    fn choose(&mut self, title: &str, options: &[&str]) -> anyhow::Result<Selection> {
        loop {
            self.clear()?;
            writeln!(self.out, "{title}\n\n")?;
            for (index, option) in options.iter().enumerate() {
                writeln!(self.out, "{}. {}", index + 1, option)?;
            }
            writeln!(self.out, "Please enter a number to select:")?;

            let Some(line) = self.read_line()? else {
                return Ok(Selection::Quit);
            };
            let flow = match parse_number::<usize>(&line) {
                Some(choice) if (1..=options.len()).contains(&choice) => {
                    return Ok(Selection::Picked(choice));
                }
                Some(_) => {
                    writeln!(self.out, "Invalid choice. Please try again.")?;
                    self.pause()?
                }
                None => self.input_error()?,
            };
            if flow == Flow::Quit {
                return Ok(Selection::Quit);
            }
        }
    }

    /// Text too long to store is an input problem; anything else is fatal.
    fn reject_oversized(&mut self, err: CatalogError) -> anyhow::Result<Flow> {
        match err {
            CatalogError::Store(StoreError::TextTooLong { len }) => {
                writeln!(
                    self.out,
                    "Input of {len} bytes is too long; the limit is {MAX_TEXT_LEN} bytes."
                )?;
                self.pause()
            }
            other => Err(other.into()),
        }
    }

    fn input_error(&mut self) -> anyhow::Result<Flow> {
        writeln!(self.out, "Only enter numerical value")?;
        self.pause()
    }

    fn pause(&mut self) -> anyhow::Result<Flow> {
        writeln!(self.out, "Press enter to continue...")?;
        Ok(match self.read_line()? {
            Some(_) => Flow::Continue,
            None => Flow::Quit,
        })
    }

    fn prompt(&mut self, question: &str) -> anyhow::Result<Option<String>> {
        write!(self.out, "{question}")?;
        self.read_line()
    }

    fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        self.out.flush()?;
        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Ok(None);
        }
        // undecodable bytes become U+FFFD and fail numeric parsing like any other typo
        let line = String::from_utf8_lossy(&raw);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        if self.clear_screen {
            write!(self.out, "{CLEAR_SCREEN}")?;
            self.out.flush()?;
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

/// Book ids are positive; zero and negatives count as bad input.
fn parse_id(raw: &str) -> Option<i32> {
    parse_number::<i32>(raw).filter(|id| *id > 0)
}
