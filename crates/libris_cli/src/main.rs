//! Libris CLI
//!
//! Command-line front end for a Libris catalog.
//!
//! # Commands
//!
//! - `add-book` / `remove-book` - Manage the catalog
//! - `register-user` / `remove-user` - Manage patrons
//! - `borrow` / `return` - Lend and take back books
//! - `search`, `books`, `users`, `loans` - Browse
//! - `overdue`, `stats` - Reports
//! - `verify` - Check that loans and borrow flags agree

mod commands;

use clap::{Parser, Subcommand};
use commands::{CliResult, OutputFormat};
use libris_core::{Catalog, CatalogConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Library catalog manager.
#[derive(Parser)]
#[command(name = "libris")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding books.json and users.json
    #[arg(global = true, short, long)]
    data_dir: Option<PathBuf>,

    /// Path to the books document (overrides --data-dir)
    #[arg(global = true, long)]
    books: Option<PathBuf>,

    /// Path to the users document (overrides --data-dir)
    #[arg(global = true, long)]
    users: Option<PathBuf>,

    /// Output format for listings and reports
    #[arg(global = true, short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a book to the catalog
    AddBook {
        /// Book title
        #[arg(short, long)]
        title: String,

        /// Book author
        #[arg(short, long)]
        author: String,

        /// Unique ISBN
        #[arg(short, long)]
        isbn: String,
    },

    /// Remove a book that is not on loan
    RemoveBook {
        /// ISBN of the book
        isbn: String,
    },

    /// Register a new user
    RegisterUser {
        /// User's name
        #[arg(short, long)]
        name: String,

        /// Unique user ID
        #[arg(short, long)]
        id: String,
    },

    /// Remove a user with no outstanding loans
    RemoveUser {
        /// User ID
        user_id: String,
    },

    /// Lend a book to a user
    Borrow {
        /// ISBN of the book
        isbn: String,

        /// User ID of the borrower
        user_id: String,
    },

    /// Take a book back from a user
    Return {
        /// ISBN of the book
        isbn: String,

        /// User ID of the borrower
        user_id: String,
    },

    /// Search by title, author, or exact ISBN
    Search {
        /// Text to look for
        query: String,
    },

    /// List books
    Books {
        /// Only show books on the shelf
        #[arg(short, long)]
        available: bool,
    },

    /// List users
    Users,

    /// List the books a user holds
    Loans {
        /// User ID
        user_id: String,
    },

    /// Report overdue books and late fees
    Overdue {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Display catalog statistics
    Stats {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Verify that loans and borrow flags agree
    Verify,

    /// Show version information
    Version,
}

impl Cli {
    fn config(&self) -> CatalogConfig {
        let mut config = match &self.data_dir {
            Some(dir) => CatalogConfig::in_dir(dir),
            None => CatalogConfig::default(),
        };
        if let Some(books) = &self.books {
            config = config.books_path(books);
        }
        if let Some(users) = &self.users {
            config = config.users_path(users);
        }
        config
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run(cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = out.flush();
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli, out: &mut dyn Write) -> CliResult<()> {
    if let Commands::Version = cli.command {
        writeln!(out, "Libris CLI v{}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "Libris Core v{}", libris_core::VERSION)?;
        return Ok(());
    }

    let format = cli.format;
    let mut catalog = Catalog::open(cli.config())?;

    match cli.command {
        Commands::AddBook {
            title,
            author,
            isbn,
        } => commands::books::add(&mut catalog, out, &title, &author, &isbn),
        Commands::RemoveBook { isbn } => commands::books::remove(&mut catalog, out, &isbn),
        Commands::RegisterUser { name, id } => {
            commands::users::register(&mut catalog, out, &name, &id)
        }
        Commands::RemoveUser { user_id } => commands::users::remove(&mut catalog, out, &user_id),
        Commands::Borrow { isbn, user_id } => {
            commands::loans::borrow(&mut catalog, out, &isbn, &user_id)
        }
        Commands::Return { isbn, user_id } => {
            commands::loans::give_back(&mut catalog, out, &isbn, &user_id)
        }
        Commands::Search { query } => commands::books::search(&catalog, out, &query, format),
        Commands::Books { available } => commands::books::list(&catalog, out, available, format),
        Commands::Users => commands::users::list(&catalog, out, format),
        Commands::Loans { user_id } => commands::users::loans(&catalog, out, &user_id, format),
        Commands::Overdue { as_of } => {
            let as_of = commands::parse_date(as_of.as_deref())?;
            commands::report::overdue(&catalog, out, as_of, format)
        }
        Commands::Stats { as_of } => {
            let as_of = commands::parse_date(as_of.as_deref())?;
            commands::report::stats(&catalog, out, as_of, format)
        }
        Commands::Verify => commands::verify::run(&catalog, out),
        Commands::Version => Ok(()),
    }
}
