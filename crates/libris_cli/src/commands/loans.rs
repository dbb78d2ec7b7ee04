//! Loan commands: borrow and return.

use super::CliResult;
use libris_core::types::DATE_FORMAT;
use libris_core::Catalog;
use std::io::Write;
use tracing::info;

/// Runs the borrow command.
pub fn borrow(
    catalog: &mut Catalog,
    out: &mut dyn Write,
    isbn: &str,
    user_id: &str,
) -> CliResult<()> {
    let due = catalog.borrow_book(isbn, user_id)?;
    info!(%isbn, %user_id, %due, "lent book");
    writeln!(out, "Book borrowed. Due back on {}.", due.format(DATE_FORMAT))?;
    Ok(())
}

/// Runs the return command.
pub fn give_back(
    catalog: &mut Catalog,
    out: &mut dyn Write,
    isbn: &str,
    user_id: &str,
) -> CliResult<()> {
    catalog.return_book(isbn, user_id)?;
    info!(%isbn, %user_id, "took book back");
    writeln!(out, "Book returned.")?;
    Ok(())
}
