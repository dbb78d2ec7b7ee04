//! Overdue report and stats commands.

use super::{write_json, CliResult, OutputFormat};
use chrono::NaiveDate;
use libris_core::types::DATE_FORMAT;
use libris_core::{Catalog, OverdueEntry};
use std::io::Write;

/// Runs the overdue command.
pub fn overdue(
    catalog: &Catalog,
    out: &mut dyn Write,
    as_of: NaiveDate,
    format: OutputFormat,
) -> CliResult<()> {
    let entries: Vec<OverdueEntry<'_>> = catalog.overdue_report(as_of).collect();

    match format {
        OutputFormat::Json => write_json(out, &entries),
        OutputFormat::Text => {
            if entries.is_empty() {
                writeln!(out, "No overdue books as of {}.", as_of.format(DATE_FORMAT))?;
            }
            for entry in &entries {
                writeln!(
                    out,
                    "Overdue: {} - Late by {} day(s), Fee: {}",
                    entry.book, entry.days_late, entry.fee
                )?;
            }
            Ok(())
        }
    }
}

/// Runs the stats command.
pub fn stats(
    catalog: &Catalog,
    out: &mut dyn Write,
    as_of: NaiveDate,
    format: OutputFormat,
) -> CliResult<()> {
    let stats = catalog.stats(as_of);

    match format {
        OutputFormat::Json => write_json(out, &stats),
        OutputFormat::Text => {
            writeln!(out, "Libris Catalog Statistics")?;
            writeln!(out, "=========================")?;
            writeln!(out)?;
            writeln!(out, "Books:")?;
            writeln!(out, "  Total:      {}", stats.books)?;
            writeln!(out, "  Borrowed:   {}", stats.borrowed)?;
            writeln!(out, "  Available:  {}", stats.available)?;
            writeln!(out)?;
            writeln!(out, "Users:        {}", stats.users)?;
            writeln!(out)?;
            writeln!(out, "As of {}:", as_of.format(DATE_FORMAT))?;
            writeln!(out, "  Overdue:    {}", stats.overdue)?;
            writeln!(out, "  Late fees:  {}", stats.outstanding_fees)?;
            Ok(())
        }
    }
}
