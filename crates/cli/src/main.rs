mod actions;
mod args;
mod commands;
mod render;
mod session;

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use libris_app::books::BookRepository;
use libris_app::users::UserRepository;
use libris_kernel::settings::Settings;
use libris_kernel::{InitCtx, ModuleRegistry};

use args::{Cli, Command};
use session::Session;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load libris settings")?;
    libris_telemetry::init(&settings.telemetry)?;

    let books_path = cli
        .books
        .clone()
        .unwrap_or_else(|| settings.storage.books_path());
    let users_path = cli
        .users
        .clone()
        .unwrap_or_else(|| settings.storage.users_path());

    tracing::info!(
        env = ?settings.environment,
        books = %books_path.display(),
        users = %users_path.display(),
        "libris starting"
    );

    let mut registry = ModuleRegistry::new();
    libris_app::register_all(&mut registry, &books_path, &users_path);
    let books = BookRepository::new(&books_path);
    let users = UserRepository::new(&users_path);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let ctx = InitCtx {
        settings: &settings,
    };
    let succeeded = registry.run(&ctx, || match cli.command {
        Command::Shell => {
            let stdin = io::stdin();
            Session::new(
                stdin.lock(),
                &mut out,
                &books,
                &users,
                settings.console.clear_screen,
            )
            .run()?;
            Ok(true)
        }
        command => commands::run(command, &books, &users, &mut out),
    })?;

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
