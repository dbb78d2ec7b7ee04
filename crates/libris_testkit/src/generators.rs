//! Property-based test generators using proptest.
//!
//! Identifiers are drawn from small pools so that random operation
//! sequences hit duplicates, unknown ids and the borrow limit often.

use chrono::{Days, NaiveDate};
use libris_core::{Book, Catalog, CatalogResult, User};
use proptest::prelude::*;

/// Strategy for ISBNs from a pool of eight.
pub fn isbn_strategy() -> impl Strategy<Value = String> {
    (0u8..8).prop_map(|n| format!("978-{n}"))
}

/// Strategy for user ids from a pool of four.
pub fn user_id_strategy() -> impl Strategy<Value = String> {
    (0u8..4).prop_map(|n| format!("user-{n}"))
}

/// Strategy for free text such as titles, authors and names.
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z][A-Za-z .']{0,23}").expect("Invalid regex")
}

/// Strategy for books that are on the shelf.
pub fn book_strategy() -> impl Strategy<Value = Book> {
    (text_strategy(), text_strategy(), isbn_strategy())
        .prop_map(|(title, author, isbn)| Book::new(title, author, isbn))
}

/// Strategy for users with no loans.
pub fn user_strategy() -> impl Strategy<Value = User> {
    (text_strategy(), user_id_strategy()).prop_map(|(name, id)| User::new(name, id))
}

/// Strategy for lending dates across a few years.
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..1500).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2022, 1, 1)
            .and_then(|start| start.checked_add_days(Days::new(offset)))
            .expect("Date in range")
    })
}

/// A single catalog mutation.
#[derive(Debug, Clone)]
pub enum CatalogOperation {
    /// Add a book
    AddBook(Book),
    /// Remove a book
    RemoveBook {
        /// Book ISBN
        isbn: String,
    },
    /// Register a user
    RegisterUser(User),
    /// Remove a user
    RemoveUser {
        /// User ID
        user_id: String,
    },
    /// Lend a book
    Borrow {
        /// Book ISBN
        isbn: String,
        /// Borrower
        user_id: String,
        /// Lending date
        on: NaiveDate,
    },
    /// Take a book back
    Return {
        /// Book ISBN
        isbn: String,
        /// Borrower
        user_id: String,
    },
}

impl CatalogOperation {
    /// Applies the operation to a catalog.
    ///
    /// # Errors
    ///
    /// Returns whatever the catalog rejects the operation with.
    pub fn apply(&self, catalog: &mut Catalog) -> CatalogResult<()> {
        match self {
            Self::AddBook(book) => catalog.add_book(book.clone()),
            Self::RemoveBook { isbn } => catalog.remove_book(isbn).map(drop),
            Self::RegisterUser(user) => catalog.register_user(user.clone()),
            Self::RemoveUser { user_id } => catalog.remove_user(user_id).map(drop),
            Self::Borrow { isbn, user_id, on } => {
                catalog.borrow_book_on(isbn, user_id, *on).map(drop)
            }
            Self::Return { isbn, user_id } => catalog.return_book(isbn, user_id),
        }
    }
}

/// Strategy for catalog operations.
pub fn catalog_operation_strategy() -> impl Strategy<Value = CatalogOperation> {
    prop_oneof![
        3 => book_strategy().prop_map(CatalogOperation::AddBook),
        1 => isbn_strategy().prop_map(|isbn| CatalogOperation::RemoveBook { isbn }),
        2 => user_strategy().prop_map(CatalogOperation::RegisterUser),
        1 => user_id_strategy().prop_map(|user_id| CatalogOperation::RemoveUser { user_id }),
        4 => (isbn_strategy(), user_id_strategy(), date_strategy())
            .prop_map(|(isbn, user_id, on)| CatalogOperation::Borrow { isbn, user_id, on }),
        2 => (isbn_strategy(), user_id_strategy())
            .prop_map(|(isbn, user_id)| CatalogOperation::Return { isbn, user_id }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<CatalogOperation>> {
    prop::collection::vec(catalog_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
