//! Test fixtures and catalog helpers.
//!
//! Provides convenience functions for setting up test catalogs
//! and common test scenarios.

use chrono::NaiveDate;
use libris_core::{Catalog, CatalogConfig};
use libris_storage::InMemoryBackend;
use std::path::Path;
use tempfile::TempDir;

/// A test catalog with automatic cleanup.
pub struct TestCatalog {
    /// The catalog instance.
    pub catalog: Catalog,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: Option<TempDir>,
}

impl TestCatalog {
    /// Creates a new in-memory test catalog.
    pub fn memory() -> Self {
        Self {
            catalog: Catalog::open_in_memory().expect("Failed to open in-memory catalog"),
            temp_dir: None,
        }
    }

    /// Creates a new file-based test catalog in a fresh temporary directory.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let catalog = Catalog::open(CatalogConfig::in_dir(temp_dir.path()))
            .expect("Failed to open file catalog");

        Self {
            catalog,
            temp_dir: Some(temp_dir),
        }
    }

    /// Creates an in-memory catalog over the given backends.
    ///
    /// The backends are shared handles, so the caller can inspect the
    /// written documents or inject write failures afterwards.
    pub fn with_backends(books: &InMemoryBackend, users: &InMemoryBackend) -> Self {
        let catalog = Catalog::open_with_backends(
            CatalogConfig::default(),
            Box::new(books.clone()),
            Box::new(users.clone()),
        )
        .expect("Failed to open catalog over backends");

        Self {
            catalog,
            temp_dir: None,
        }
    }

    /// Returns the data directory if file-based, None if in-memory.
    pub fn dir(&self) -> Option<&Path> {
        self.temp_dir.as_ref().map(TempDir::path)
    }

    /// Opens the same documents again, as a new process would.
    ///
    /// # Panics
    ///
    /// Panics for in-memory catalogs.
    pub fn reopen(&self) -> Catalog {
        let dir = self.dir().expect("Only file catalogs can be reopened");
        Catalog::open(CatalogConfig::in_dir(dir)).expect("Failed to reopen catalog")
    }
}

impl std::ops::Deref for TestCatalog {
    type Target = Catalog;

    fn deref(&self) -> &Self::Target {
        &self.catalog
    }
}

impl std::ops::DerefMut for TestCatalog {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.catalog
    }
}

/// Runs a test with a temporary in-memory catalog.
pub fn with_temp_catalog<F, R>(f: F) -> R
where
    F: FnOnce(&mut Catalog) -> R,
{
    let mut test_catalog = TestCatalog::memory();
    f(&mut test_catalog.catalog)
}

/// Runs a test with a temporary file-based catalog.
///
/// The closure also receives the data directory.
pub fn with_file_catalog<F, R>(f: F) -> R
where
    F: FnOnce(&mut Catalog, &Path) -> R,
{
    let mut test_catalog = TestCatalog::file();
    let dir = test_catalog
        .temp_dir
        .as_ref()
        .map(|d| d.path().to_path_buf())
        .expect("File catalog should have a directory");
    f(&mut test_catalog.catalog, &dir)
}

/// Shorthand for a calendar date in tests.
///
/// # Panics
///
/// Panics if the date does not exist.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("Invalid test date")
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use libris_core::{Book, User};

    /// The books stocked by [`stocked_catalog`].
    pub const BOOKS: [(&str, &str, &str); 5] = [
        ("The Hobbit", "J.R.R. Tolkien", "111"),
        ("Dune", "Frank Herbert", "222"),
        ("Emma", "Jane Austen", "333"),
        ("The Fellowship of the Ring", "J.R.R. Tolkien", "444"),
        ("Neuromancer", "William Gibson", "555"),
    ];

    /// The users registered by [`stocked_catalog`].
    pub const USERS: [(&str, &str); 2] = [("Alice", "u1"), ("Bob", "u2")];

    /// Creates an in-memory catalog with [`BOOKS`] and [`USERS`] and no loans.
    pub fn stocked_catalog() -> TestCatalog {
        let mut test_catalog = TestCatalog::memory();
        stock(&mut test_catalog);
        test_catalog
    }

    /// Creates a file-based catalog with [`BOOKS`] and [`USERS`] and no loans.
    pub fn stocked_file_catalog() -> TestCatalog {
        let mut test_catalog = TestCatalog::file();
        stock(&mut test_catalog);
        test_catalog
    }

    /// Creates a stocked catalog where Alice (`u1`) holds `111` and `222`
    /// and Bob (`u2`) holds `333`, all lent on `lent_on`.
    pub fn catalog_with_loans(lent_on: NaiveDate) -> TestCatalog {
        let mut test_catalog = stocked_catalog();
        for (isbn, user_id) in [("111", "u1"), ("222", "u1"), ("333", "u2")] {
            test_catalog
                .borrow_book_on(isbn, user_id, lent_on)
                .expect("Failed to lend book");
        }
        test_catalog
    }

    /// Creates a catalog with `count` books, ISBNs `isbn-0` upwards.
    pub fn catalog_with_books(count: usize) -> TestCatalog {
        let mut test_catalog = TestCatalog::memory();
        for i in 0..count {
            test_catalog
                .add_book(Book::new(
                    format!("Title {i}"),
                    format!("Author {}", i % 7),
                    format!("isbn-{i}"),
                ))
                .expect("Failed to add book");
        }
        test_catalog
    }

    fn stock(catalog: &mut Catalog) {
        for (title, author, isbn) in BOOKS {
            catalog
                .add_book(Book::new(title, author, isbn))
                .expect("Failed to add book");
        }
        for (name, user_id) in USERS {
            catalog
                .register_user(User::new(name, user_id))
                .expect("Failed to register user");
        }
    }
}
