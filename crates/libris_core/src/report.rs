//! Overdue report and catalog statistics.

use crate::book::Book;
use crate::catalog::Catalog;
use crate::types::late_fee;
use chrono::NaiveDate;
use serde::Serialize;

/// One overdue loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverdueEntry<'a> {
    /// The borrowed book.
    pub book: &'a Book,
    /// Whole days since the due date, always at least 1.
    pub days_late: i64,
    /// Late fee owed, in whole currency units.
    pub fee: u64,
}

/// Summary counts over the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    /// Number of books.
    pub books: usize,
    /// Number of books on loan.
    pub borrowed: usize,
    /// Number of books on the shelf.
    pub available: usize,
    /// Number of registered users.
    pub users: usize,
    /// Number of loans past due.
    pub overdue: usize,
    /// Sum of late fees on overdue loans.
    pub outstanding_fees: u64,
}

impl Catalog {
    /// Lists loans that were due strictly before `as_of`, with their fees.
    ///
    /// A book due on `as_of` itself is not overdue yet.
    pub fn overdue_report(&self, as_of: NaiveDate) -> impl Iterator<Item = OverdueEntry<'_>> + '_ {
        self.books.values().filter_map(move |book| {
            book.days_overdue(as_of).map(|days_late| OverdueEntry {
                book,
                days_late,
                fee: late_fee(days_late),
            })
        })
    }

    /// Computes summary counts as of `as_of`.
    #[must_use]
    pub fn stats(&self, as_of: NaiveDate) -> CatalogStats {
        let borrowed = self.books.values().filter(|b| b.is_borrowed()).count();
        let (overdue, outstanding_fees) = self
            .overdue_report(as_of)
            .fold((0, 0), |(count, fees), entry| (count + 1, fees + entry.fee));

        CatalogStats {
            books: self.books.len(),
            borrowed,
            available: self.books.len() - borrowed,
            users: self.users.len(),
            overdue,
            outstanding_fees,
        }
    }
}
