//! User commands: register, remove, list, loans.

use super::{write_items, CliResult, OutputFormat};
use libris_core::{Book, Catalog, User};
use std::io::Write;
use tracing::info;

/// Runs the register-user command.
pub fn register(
    catalog: &mut Catalog,
    out: &mut dyn Write,
    name: &str,
    user_id: &str,
) -> CliResult<()> {
    catalog.register_user(User::new(name, user_id))?;
    info!(%user_id, "registered user");
    writeln!(out, "User registered.")?;
    Ok(())
}

/// Runs the remove-user command.
pub fn remove(catalog: &mut Catalog, out: &mut dyn Write, user_id: &str) -> CliResult<()> {
    let user = catalog.remove_user(user_id)?;
    writeln!(out, "Removed: {user}")?;
    Ok(())
}

/// Runs the users command.
pub fn list(catalog: &Catalog, out: &mut dyn Write, format: OutputFormat) -> CliResult<()> {
    let users: Vec<&User> = catalog.list_users().collect();
    write_items(out, format, &users, "No registered users.")
}

/// Runs the loans command.
pub fn loans(
    catalog: &Catalog,
    out: &mut dyn Write,
    user_id: &str,
    format: OutputFormat,
) -> CliResult<()> {
    let books: Vec<&Book> = catalog.list_user_borrowed_books(user_id)?.collect();
    write_items(out, format, &books, "No borrowed books.")
}
