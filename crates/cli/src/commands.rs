//! One-shot subcommands.

use std::io::Write;

use libris_app::books::{BookFilter, BookRepository};
use libris_app::users::UserRepository;

use crate::actions::BookAction;
use crate::args::{
    BookCommand, Command, LoanCommand, OutputArgs, ReadCommand, UserCommand, WishlistCommand,
};
use crate::render;

/// Run a non-interactive command.
///
/// Returns `false` when the command could not find what it was asked to
/// change, or when login credentials do not match.
pub fn run(
    command: Command,
    books: &BookRepository,
    users: &UserRepository,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    match command {
        Command::Book(BookCommand::Add { name }) => {
            let book = books.add(&name)?;
            writeln!(out, "Book with ID '{}' has been added.", book.id)?;
            Ok(true)
        }
        Command::Book(BookCommand::Delete { id }) => act(books, BookAction::Delete, id, out),
        Command::Book(BookCommand::Update { id, name }) => {
            act(books, BookAction::Rename(name), id, out)
        }
        Command::Book(BookCommand::List { filter, output }) => {
            list(books, filter.into(), output, out)
        }
        Command::Loan(LoanCommand::Borrow { id }) => act(books, BookAction::Borrow, id, out),
        Command::Loan(LoanCommand::GiveBack { id }) => act(books, BookAction::GiveBack, id, out),
        Command::Loan(LoanCommand::List { output }) => list(books, BookFilter::Loaned, output, out),
        Command::Wishlist(WishlistCommand::Add { id }) => act(books, BookAction::Wishlist, id, out),
        Command::Wishlist(WishlistCommand::Remove { id }) => {
            act(books, BookAction::Unwishlist, id, out)
        }
        Command::Wishlist(WishlistCommand::List { output }) => {
            list(books, BookFilter::Wishlisted, output, out)
        }
        Command::Read(ReadCommand::Mark { id }) => act(books, BookAction::MarkRead, id, out),
        Command::Read(ReadCommand::History { output }) => {
            list(books, BookFilter::Read, output, out)
        }
        Command::Read(ReadCommand::Progress { output }) => {
            list(books, BookFilter::All, output, out)
        }
        Command::User(UserCommand::Register { email, password }) => {
            let user = users.register(&email, &password)?;
            writeln!(out, "User '{}' registered.", user.email)?;
            Ok(true)
        }
        Command::User(UserCommand::Login { email, password }) => {
            let found = users.find_by_credentials(&email, &password)?.is_some();
            if found {
                writeln!(out, "Login successful.")?;
            } else {
                writeln!(out, "Invalid email or password. Please try again.")?;
            }
            Ok(found)
        }
        Command::Shell => anyhow::bail!("the interactive shell is not a one-shot command"),
    }
}

fn act(
    books: &BookRepository,
    action: BookAction,
    id: i32,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    let found = action.apply(books, id)?;
    writeln!(out, "{}", action.report(id, found))?;
    Ok(found)
}

fn list(
    books: &BookRepository,
    filter: BookFilter,
    output: OutputArgs,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    let selected = books.list(filter)?;
    if output.json {
        render::write_books_json(out, &selected)?;
    } else {
        render::write_books(out, &selected, filter)?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::FilterArg;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        books: BookRepository,
        users: UserRepository,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let books = BookRepository::new(dir.path().join("books.bin"));
            let users = UserRepository::new(dir.path().join("users.bin"));
            Self {
                _dir: dir,
                books,
                users,
            }
        }

        fn run(&self, command: Command) -> (bool, String) {
            let mut out = Vec::new();
            let ok = run(command, &self.books, &self.users, &mut out).unwrap();
            (ok, String::from_utf8(out).unwrap())
        }
    }

    fn plain() -> OutputArgs {
        OutputArgs { json: false }
    }

    #[test]
    fn add_then_list_catalog() {
        let fx = Fixture::new();
        let (ok, text) = fx.run(Command::Book(BookCommand::Add {
            name: "Dune".to_string(),
        }));
        assert!(ok);
        assert_eq!(text, "Book with ID '1' has been added.\n");

        let (_, text) = fx.run(Command::Book(BookCommand::List {
            filter: FilterArg::All,
            output: plain(),
        }));
        assert_eq!(text, "1. Dune (Unread : UnWishlisted)\n");
    }

    #[test]
    fn second_borrow_fails() {
        let fx = Fixture::new();
        fx.books.add("A").unwrap();

        let (ok, text) = fx.run(Command::Loan(LoanCommand::Borrow { id: 1 }));
        assert!(ok);
        assert_eq!(text, "Book borrowed successfully.\n");

        let (ok, text) = fx.run(Command::Loan(LoanCommand::Borrow { id: 1 }));
        assert!(!ok);
        assert_eq!(text, "There is no book you want!\n");

        let (_, text) = fx.run(Command::Loan(LoanCommand::List { output: plain() }));
        assert_eq!(text, "1. A (Unread : UnWishlisted)\n");
    }

    #[test]
    fn empty_wishlist_message() {
        let fx = Fixture::new();
        let (ok, text) = fx.run(Command::Wishlist(WishlistCommand::List { output: plain() }));
        assert!(ok);
        assert_eq!(text, "You bought all the books on your wish list.\n");
    }

    #[test]
    fn mark_read_shows_up_in_history() {
        let fx = Fixture::new();
        fx.books.add("A").unwrap();
        fx.books.add("B").unwrap();

        let (ok, _) = fx.run(Command::Read(ReadCommand::Mark { id: 2 }));
        assert!(ok);
        let (_, text) = fx.run(Command::Read(ReadCommand::History { output: plain() }));
        assert_eq!(text, "2. B (Read : UnWishlisted)\n");
    }

    #[test]
    fn login_requires_matching_password() {
        let fx = Fixture::new();
        fx.run(Command::User(UserCommand::Register {
            email: "a@x.com".to_string(),
            password: "p1".to_string(),
        }));

        let (ok, text) = fx.run(Command::User(UserCommand::Login {
            email: "a@x.com".to_string(),
            password: "p1".to_string(),
        }));
        assert!(ok);
        assert_eq!(text, "Login successful.\n");

        let (ok, text) = fx.run(Command::User(UserCommand::Login {
            email: "a@x.com".to_string(),
            password: "wrong".to_string(),
        }));
        assert!(!ok);
        assert_eq!(text, "Invalid email or password. Please try again.\n");
    }
}
