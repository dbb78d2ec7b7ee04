//! Verify command implementation.

use super::{CliError, CliResult};
use libris_core::Catalog;
use std::io::Write;

/// Runs the verify command.
///
/// Prints every inconsistency between the books and users documents and
/// fails if there is at least one.
pub fn run(catalog: &Catalog, out: &mut dyn Write) -> CliResult<()> {
    let issues = catalog.integrity_issues();

    writeln!(
        out,
        "Checked {} book(s) and {} user(s).",
        catalog.book_count(),
        catalog.user_count()
    )?;

    if issues.is_empty() {
        writeln!(out, "OK: loans and borrow flags agree.")?;
        return Ok(());
    }

    for issue in &issues {
        writeln!(out, "  [FAIL] {issue}")?;
    }
    Err(CliError::Integrity(issues.len()))
}
