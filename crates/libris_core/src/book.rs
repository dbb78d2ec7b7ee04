//! Book entity and its borrow state.

use crate::entity::CatalogEntity;
use crate::error::{CatalogError, CatalogResult, EntityKind};
use crate::types::{today, Isbn, DATE_FORMAT, LOAN_PERIOD_DAYS};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A catalog item.
///
/// A book is either available or borrowed until a due date. The state is
/// held as a single optional due date, so "borrowed without a due date"
/// cannot be represented. The only ways to change it are [`Book::borrow_on`]
/// and [`Book::return_book`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BookRecord")]
pub struct Book {
    title: String,
    author: String,
    isbn: Isbn,
    due_date: Option<NaiveDate>,
}

impl Book {
    /// Creates a new, available book.
    #[must_use]
    pub fn new(title: impl Into<String>, author: impl Into<String>, isbn: impl Into<Isbn>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            due_date: None,
        }
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the author.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the ISBN.
    #[must_use]
    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    /// Returns whether the book is currently on loan.
    #[must_use]
    pub fn is_borrowed(&self) -> bool {
        self.due_date.is_some()
    }

    /// Returns the due date of the current loan, if any.
    #[must_use]
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Borrows the book as of today. See [`Book::borrow_on`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` if the book is already borrowed.
    pub fn borrow(&mut self) -> CatalogResult<NaiveDate> {
        self.borrow_on(today())
    }

    /// Borrows the book on `date`, due [`LOAN_PERIOD_DAYS`] days later.
    ///
    /// Returns the due date. The book is left unchanged on error.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` if the book is already borrowed or
    /// the due date falls outside the supported calendar.
    pub fn borrow_on(&mut self, date: NaiveDate) -> CatalogResult<NaiveDate> {
        if let Some(due) = self.due_date {
            return Err(CatalogError::invalid_transition(format!(
                "book {} is already borrowed (due {})",
                self.isbn,
                due.format(DATE_FORMAT)
            )));
        }
        let due = due_date_for(date)?;
        self.due_date = Some(due);
        Ok(due)
    }

    /// Returns the book to the shelf.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` if the book is not borrowed.
    pub fn return_book(&mut self) -> CatalogResult<()> {
        if self.due_date.take().is_none() {
            return Err(CatalogError::invalid_transition(format!(
                "book {} is not borrowed",
                self.isbn
            )));
        }
        Ok(())
    }

    /// Returns whether the loan was due strictly before `as_of`.
    #[must_use]
    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        self.days_overdue(as_of).is_some()
    }

    /// Number of whole days past due as of `as_of`.
    ///
    /// `None` if the book is available or not yet overdue.
    #[must_use]
    pub fn days_overdue(&self, as_of: NaiveDate) -> Option<i64> {
        self.due_date
            .filter(|due| *due < as_of)
            .map(|due| (as_of - due).num_days())
    }

    /// Case-insensitive match against title and author, or exact ISBN match.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches(&self, needle: &str, raw: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.author.to_lowercase().contains(needle)
            || self.isbn.as_str() == raw
    }
}

/// Due date of a loan starting on `date`.
pub(crate) fn due_date_for(date: NaiveDate) -> CatalogResult<NaiveDate> {
    date.checked_add_days(Days::new(LOAN_PERIOD_DAYS))
        .ok_or_else(|| CatalogError::invalid_transition(format!("no due date after {date}")))
}

impl CatalogEntity for Book {
    type Id = Isbn;
    const KIND: EntityKind = EntityKind::Book;

    fn id(&self) -> &Isbn {
        &self.isbn
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Title: {}, Author: {}, ISBN: {}, Status: ",
            self.title, self.author, self.isbn
        )?;
        match self.due_date {
            Some(due) => write!(f, "Borrowed (Due: {})", due.format(DATE_FORMAT)),
            None => f.write_str("Available"),
        }
    }
}

/// Persisted layout of a book.
#[derive(Debug, Serialize, Deserialize)]
struct BookRecord {
    title: String,
    author: String,
    isbn: Isbn,
    is_borrowed: bool,
    #[serde(default)]
    due_date: Option<NaiveDate>,
}

impl TryFrom<BookRecord> for Book {
    type Error = String;

    fn try_from(record: BookRecord) -> Result<Self, Self::Error> {
        if record.is_borrowed != record.due_date.is_some() {
            return Err(format!(
                "book {}: is_borrowed is {} but due_date is {}",
                record.isbn,
                record.is_borrowed,
                if record.due_date.is_some() { "set" } else { "missing" }
            ));
        }
        Ok(Self {
            title: record.title,
            author: record.author,
            isbn: record.isbn,
            due_date: record.due_date,
        })
    }
}

/// Borrowed view of [`BookRecord`] used for writing.
#[derive(Serialize)]
struct BookRecordRef<'a> {
    title: &'a str,
    author: &'a str,
    isbn: &'a Isbn,
    is_borrowed: bool,
    due_date: Option<NaiveDate>,
}

impl Serialize for Book {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        BookRecordRef {
            title: &self.title,
            author: &self.author,
            isbn: &self.isbn,
            is_borrowed: self.is_borrowed(),
            due_date: self.due_date,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hobbit() -> Book {
        Book::new("The Hobbit", "J.R.R. Tolkien", "111")
    }

    #[test]
    fn new_book_is_available() {
        let book = hobbit();
        assert!(!book.is_borrowed());
        assert!(book.due_date().is_none());
        assert_eq!(book.isbn().as_str(), "111");
    }

    #[test]
    fn borrow_sets_due_date_two_weeks_out() {
        let mut book = hobbit();
        let due = book.borrow_on(date(2024, 3, 1)).unwrap();
        assert_eq!(due, date(2024, 3, 15));
        assert!(book.is_borrowed());
        assert_eq!(book.due_date(), Some(due));
    }

    #[test]
    fn borrow_today() {
        let mut book = hobbit();
        let due = book.borrow().unwrap();
        assert_eq!(due, today() + Days::new(14));
    }

    #[test]
    fn double_borrow_fails_without_change() {
        let mut book = hobbit();
        book.borrow_on(date(2024, 3, 1)).unwrap();

        let result = book.borrow_on(date(2024, 3, 5));
        assert!(matches!(
            result,
            Err(CatalogError::InvalidStateTransition { .. })
        ));
        assert_eq!(book.due_date(), Some(date(2024, 3, 15)));
    }

    #[test]
    fn return_clears_state() {
        let mut book = hobbit();
        book.borrow_on(date(2024, 3, 1)).unwrap();
        book.return_book().unwrap();
        assert!(!book.is_borrowed());
        assert!(book.due_date().is_none());
    }

    #[test]
    fn return_available_book_fails() {
        let mut book = hobbit();
        assert!(matches!(
            book.return_book(),
            Err(CatalogError::InvalidStateTransition { .. })
        ));
        assert!(!book.is_borrowed());
    }

    #[test]
    fn overdue_is_strictly_after_due_date() {
        let mut book = hobbit();
        book.borrow_on(date(2024, 3, 1)).unwrap();

        assert_eq!(book.days_overdue(date(2024, 3, 14)), None);
        assert_eq!(book.days_overdue(date(2024, 3, 15)), None);
        assert_eq!(book.days_overdue(date(2024, 3, 16)), Some(1));
        assert_eq!(book.days_overdue(date(2024, 4, 14)), Some(30));
        assert!(!hobbit().is_overdue(date(2030, 1, 1)));
    }

    #[test]
    fn display_available() {
        assert_eq!(
            hobbit().to_string(),
            "Title: The Hobbit, Author: J.R.R. Tolkien, ISBN: 111, Status: Available"
        );
    }

    #[test]
    fn display_borrowed() {
        let mut book = hobbit();
        book.borrow_on(date(2024, 3, 1)).unwrap();
        assert!(book
            .to_string()
            .ends_with("Status: Borrowed (Due: 2024-03-15)"));
    }

    #[test]
    fn serialized_layout() {
        let mut book = hobbit();
        book.borrow_on(date(2024, 3, 1)).unwrap();

        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "title": "The Hobbit",
                "author": "J.R.R. Tolkien",
                "isbn": "111",
                "is_borrowed": true,
                "due_date": "2024-03-15",
            })
        );

        let available = serde_json::to_value(hobbit()).unwrap();
        assert_eq!(available["is_borrowed"], false);
        assert!(available["due_date"].is_null());
    }

    #[test]
    fn serde_round_trip() {
        let mut borrowed = hobbit();
        borrowed.borrow_on(date(2024, 3, 1)).unwrap();

        for book in [hobbit(), borrowed] {
            let json = serde_json::to_string(&book).unwrap();
            let back: Book = serde_json::from_str(&json).unwrap();
            assert_eq!(back, book);
        }
    }

    #[test]
    fn inconsistent_record_is_rejected() {
        let json = r#"{"title":"t","author":"a","isbn":"1","is_borrowed":true,"due_date":null}"#;
        assert!(serde_json::from_str::<Book>(json).is_err());

        let json = r#"{"title":"t","author":"a","isbn":"1","is_borrowed":false,"due_date":"2024-01-01"}"#;
        assert!(serde_json::from_str::<Book>(json).is_err());
    }

    #[test]
    fn missing_due_date_field_means_available() {
        let json = r#"{"title":"t","author":"a","isbn":"1","is_borrowed":false}"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert!(!book.is_borrowed());
    }

    #[test]
    fn search_matching() {
        let book = hobbit();
        assert!(book.matches("tolkien", "tolkien"));
        assert!(book.matches("hobb", "Hobb"));
        assert!(book.matches("111", "111"));
        assert!(!book.matches("silmarillion", "Silmarillion"));
    }

    mod props {
        use super::*;
        use crate::types::{late_fee, LATE_FEE_PER_DAY, LOAN_PERIOD_DAYS};
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn due_date_and_lateness(start in 0u64..3650, offset in 0u64..120) {
                let lent_on = date(2020, 1, 1) + Days::new(start);
                let as_of = lent_on + Days::new(offset);

                let mut book = hobbit();
                let due = book.borrow_on(lent_on).unwrap();
                prop_assert_eq!((due - lent_on).num_days(), 14);

                let expected = offset.checked_sub(LOAN_PERIOD_DAYS).filter(|d| *d > 0);
                let days = book.days_overdue(as_of);
                prop_assert_eq!(days.map(i64::unsigned_abs), expected);
                prop_assert_eq!(
                    late_fee(days.unwrap_or(0)),
                    LATE_FEE_PER_DAY * expected.unwrap_or(0)
                );
            }
        }
    }
}
