//! Core type definitions for Libris.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Maximum number of books a user may hold at once.
pub const MAX_BORROW_LIMIT: usize = 3;

/// Length of a loan in days.
pub const LOAN_PERIOD_DAYS: u64 = 14;

/// Late fee charged per day past the due date, in whole currency units.
pub const LATE_FEE_PER_DAY: u64 = 5;

/// Format of every persisted and displayed date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns today's date in the local time zone.
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Late fee owed for a loan that is `days_late` days past due.
///
/// Negative or zero lateness costs nothing.
#[must_use]
pub fn late_fee(days_late: i64) -> u64 {
    u64::try_from(days_late)
        .unwrap_or(0)
        .saturating_mul(LATE_FEE_PER_DAY)
}

/// Unique identifier for a book.
///
/// ISBNs are opaque text; no checksum validation is performed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Isbn(String);

impl Isbn {
    /// Creates a new ISBN.
    #[must_use]
    pub fn new(isbn: impl Into<String>) -> Self {
        Self(isbn.into())
    }

    /// Returns the ISBN text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Isbn {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Isbn {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Isbn {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Unique identifier for a registered user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new user ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for UserId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
