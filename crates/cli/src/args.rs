use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use libris_app::books::BookFilter;

/// Personal library catalog
#[derive(Debug, Parser)]
#[command(name = "libris", version, about)]
pub struct Cli {
    /// Book record file; defaults to `storage.data_dir/storage.books_file`
    #[arg(long, global = true, value_name = "PATH")]
    pub books: Option<PathBuf>,

    /// User record file; defaults to `storage.data_dir/storage.users_file`
    #[arg(long, global = true, value_name = "PATH")]
    pub users: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add, delete, rename and list books
    #[command(subcommand)]
    Book(BookCommand),
    /// Borrow and give back books
    #[command(subcommand)]
    Loan(LoanCommand),
    /// Manage the wishlist
    #[command(subcommand)]
    Wishlist(WishlistCommand),
    /// Reading tracker
    #[command(subcommand)]
    Read(ReadCommand),
    /// Register and log in
    #[command(subcommand)]
    User(UserCommand),
    /// Interactive menu session
    Shell,
}

#[derive(Debug, Subcommand)]
pub enum BookCommand {
    Add {
        name: String,
    },
    Delete {
        #[arg(value_parser = positive_id())]
        id: i32,
    },
    Update {
        #[arg(value_parser = positive_id())]
        id: i32,
        name: String,
    },
    List {
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum LoanCommand {
    Borrow {
        #[arg(value_parser = positive_id())]
        id: i32,
    },
    GiveBack {
        #[arg(value_parser = positive_id())]
        id: i32,
    },
    /// Books currently loaned
    List {
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum WishlistCommand {
    Add {
        #[arg(value_parser = positive_id())]
        id: i32,
    },
    Remove {
        #[arg(value_parser = positive_id())]
        id: i32,
    },
    List {
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum ReadCommand {
    /// Mark a book as read
    Mark {
        #[arg(value_parser = positive_id())]
        id: i32,
    },
    /// Books marked as read
    History {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Every book with its read status
    Progress {
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    Register { email: String, password: String },
    Login { email: String, password: String },
}

#[derive(Debug, Clone, Copy, Args)]
pub struct OutputArgs {
    /// Print books as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    All,
    Loaned,
    Unloaned,
    Wishlisted,
    Unwishlisted,
    Read,
    Unread,
}

/// Book ids start at 1.
fn positive_id() -> clap::builder::RangedI64ValueParser<i32> {
    clap::value_parser!(i32).range(1..)
}

impl From<FilterArg> for BookFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => BookFilter::All,
            FilterArg::Loaned => BookFilter::Loaned,
            FilterArg::Unloaned => BookFilter::Unloaned,
            FilterArg::Wishlisted => BookFilter::Wishlisted,
            FilterArg::Unwishlisted => BookFilter::Unwishlisted,
            FilterArg::Read => BookFilter::Read,
            FilterArg::Unread => BookFilter::Unread,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_nested_subcommands_and_global_paths() {
        let cli = Cli::try_parse_from([
            "libris", "loan", "give-back", "3", "--books", "/tmp/b.bin",
        ])
        .unwrap();

        assert_eq!(cli.books.as_deref(), Some(std::path::Path::new("/tmp/b.bin")));
        assert!(matches!(cli.command, Command::Loan(LoanCommand::GiveBack { id: 3 })));
    }

    #[test]
    fn list_filter_defaults_to_all() {
        let cli = Cli::try_parse_from(["libris", "book", "list"]).unwrap();
        match cli.command {
            Command::Book(BookCommand::List { filter, output }) => {
                assert_eq!(filter, FilterArg::All);
                assert!(!output.json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn non_positive_id_is_rejected() {
        assert!(Cli::try_parse_from(["libris", "book", "delete", "0"]).is_err());
        assert!(Cli::try_parse_from(["libris", "read", "mark", "--", "-1"]).is_err());
        assert!(Cli::try_parse_from(["libris", "book", "update", "1", "Dune"]).is_ok());
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        assert!(Cli::try_parse_from(["libris", "loan", "borrow", "three"]).is_err());
    }
}
