//! CLI command implementations.
//!
//! Every command writes its result to the given writer so the output can
//! be captured in tests; logging goes to stderr through `tracing`.

pub mod books;
pub mod loans;
pub mod report;
pub mod users;
pub mod verify;

use chrono::NaiveDate;
use clap::ValueEnum;
use libris_core::types::{today, DATE_FORMAT};
use libris_core::CatalogError;
use serde::Serialize;
use std::io::{self, Write};
use thiserror::Error;

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The catalog rejected the operation or could not be persisted.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A date argument could not be parsed.
    #[error("invalid date {input:?}: expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected argument.
        input: String,
    },

    /// Writing output failed.
    #[error("output error: {0}")]
    Io(#[from] io::Error),

    /// Encoding JSON output failed.
    #[error("output error: {0}")]
    Json(#[from] serde_json::Error),

    /// The catalog documents are inconsistent.
    #[error("{0} integrity issue(s) found")]
    Integrity(usize),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// Rejected operations exit with 1, everything else with 2.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Catalog(e) if e.is_rejection() => 1,
            Self::Integrity(_) => 1,
            _ => 2,
        }
    }
}

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One human-readable line per item.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Parses an optional `YYYY-MM-DD` argument, defaulting to today.
pub fn parse_date(input: Option<&str>) -> CliResult<NaiveDate> {
    match input {
        None => Ok(today()),
        Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| {
            CliError::InvalidDate {
                input: text.to_string(),
            }
        }),
    }
}

/// Writes items as JSON, or one `Display` line each as text.
///
/// `empty` is printed instead of nothing when a text listing has no items.
pub fn write_items<T>(
    out: &mut dyn Write,
    format: OutputFormat,
    items: &[T],
    empty: &str,
) -> CliResult<()>
where
    T: Serialize + std::fmt::Display,
{
    match format {
        OutputFormat::Json => write_json(out, &items),
        OutputFormat::Text => {
            if items.is_empty() {
                writeln!(out, "{empty}")?;
            }
            for item in items {
                writeln!(out, "{item}")?;
            }
            Ok(())
        }
    }
}

/// Writes a value as pretty JSON followed by a newline.
pub fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
