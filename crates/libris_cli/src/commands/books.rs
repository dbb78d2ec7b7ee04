//! Book commands: add, remove, search, list.

use super::{write_items, CliResult, OutputFormat};
use libris_core::{Book, Catalog};
use std::io::Write;
use tracing::info;

/// Runs the add-book command.
pub fn add(
    catalog: &mut Catalog,
    out: &mut dyn Write,
    title: &str,
    author: &str,
    isbn: &str,
) -> CliResult<()> {
    catalog.add_book(Book::new(title, author, isbn))?;
    info!(%isbn, "added book");
    writeln!(out, "Book added.")?;
    Ok(())
}

/// Runs the remove-book command.
pub fn remove(catalog: &mut Catalog, out: &mut dyn Write, isbn: &str) -> CliResult<()> {
    let book = catalog.remove_book(isbn)?;
    writeln!(out, "Removed: {book}")?;
    Ok(())
}

/// Runs the search command.
pub fn search(
    catalog: &Catalog,
    out: &mut dyn Write,
    query: &str,
    format: OutputFormat,
) -> CliResult<()> {
    let books = catalog.search_books(query);
    write_items(out, format, &books, "No matching books.")
}

/// Runs the books command.
pub fn list(
    catalog: &Catalog,
    out: &mut dyn Write,
    available_only: bool,
    format: OutputFormat,
) -> CliResult<()> {
    let books: Vec<&Book> = catalog.list_books(available_only).collect();
    let empty = if available_only {
        "No books available."
    } else {
        "The catalog is empty."
    };
    write_items(out, format, &books, empty)
}
