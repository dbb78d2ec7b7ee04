//! Catalog facade: ownership of books and users, loans, persistence.

use crate::book::Book;
use crate::config::CatalogConfig;
use crate::entity::CatalogEntity;
use crate::error::{CatalogError, CatalogResult};
use crate::types::{today, Isbn, UserId};
use crate::user::User;
use chrono::NaiveDate;
use indexmap::IndexMap;
use libris_storage::{FileBackend, InMemoryBackend, StorageBackend};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::Serialize;
use serde_json::ser::PrettyFormatter;
use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;
use tracing::{debug, info, warn};

/// The catalog handle.
///
/// `Catalog` owns every [`Book`] and [`User`] and is the only place loans
/// are recorded, so a book's borrowed flag and the holder's ISBN list are
/// always changed together.
///
/// Every successful mutation rewrites both documents before returning.
/// Read operations never touch storage.
///
/// # Opening a Catalog
///
/// ```rust,no_run
/// use libris_core::{Book, Catalog, CatalogConfig, User};
///
/// let mut catalog = Catalog::open(CatalogConfig::in_dir("library"))?;
/// catalog.add_book(Book::new("The Hobbit", "J.R.R. Tolkien", "111"))?;
/// catalog.register_user(User::new("Alice", "u1"))?;
/// let due = catalog.borrow_book("111", "u1")?;
/// println!("due back on {due}");
/// # Ok::<(), libris_core::CatalogError>(())
/// ```
///
/// # In-Memory Catalogs
///
/// For testing, use `Catalog::open_in_memory()`:
///
/// ```rust
/// let catalog = libris_core::Catalog::open_in_memory()?;
/// assert_eq!(catalog.book_count(), 0);
/// # Ok::<(), libris_core::CatalogError>(())
/// ```
pub struct Catalog {
    /// Configuration.
    config: CatalogConfig,
    /// Books by ISBN, in insertion order.
    pub(crate) books: IndexMap<Isbn, Book>,
    /// Users by ID, in registration order.
    pub(crate) users: IndexMap<UserId, User>,
    /// Where the books document lives.
    book_store: Box<dyn StorageBackend>,
    /// Where the users document lives.
    user_store: Box<dyn StorageBackend>,
}

impl Catalog {
    /// Opens the catalog stored at the configured paths.
    ///
    /// Missing documents start out as empty collections.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceLoad` if a document exists but is malformed, or
    /// a storage error if it cannot be read.
    pub fn open(config: CatalogConfig) -> CatalogResult<Self> {
        let book_store = Self::file_backend(&config, &config.books_path)?;
        let user_store = Self::file_backend(&config, &config.users_path)?;
        Self::open_with_backends(config, Box::new(book_store), Box::new(user_store))
    }

    /// Opens an empty catalog that lives only in memory.
    ///
    /// # Errors
    ///
    /// Returns an error only if the empty backends cannot be read.
    pub fn open_in_memory() -> CatalogResult<Self> {
        Self::open_with_backends(
            CatalogConfig::default(),
            Box::new(InMemoryBackend::new()),
            Box::new(InMemoryBackend::new()),
        )
    }

    /// Opens a catalog over arbitrary storage backends.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceLoad` if a document is malformed, or a storage
    /// error if it cannot be read.
    pub fn open_with_backends(
        config: CatalogConfig,
        book_store: Box<dyn StorageBackend>,
        user_store: Box<dyn StorageBackend>,
    ) -> CatalogResult<Self> {
        let books = load_document::<Book>(book_store.as_ref())?;
        let users = load_document::<User>(user_store.as_ref())?;

        let catalog = Self {
            config,
            books,
            users,
            book_store,
            user_store,
        };

        info!(
            books = catalog.books.len(),
            users = catalog.users.len(),
            books_document = %catalog.book_store.describe(),
            users_document = %catalog.user_store.describe(),
            "catalog opened"
        );
        for issue in catalog.integrity_issues() {
            warn!(%issue, "catalog documents disagree");
        }

        Ok(catalog)
    }

    fn file_backend(config: &CatalogConfig, path: &Path) -> CatalogResult<FileBackend> {
        let backend = if config.create_dirs {
            FileBackend::open_with_create_dirs(path)?
        } else {
            FileBackend::open(path)?
        };
        Ok(backend.sync_on_write(config.sync_on_write))
    }

    /// Returns the configuration the catalog was opened with.
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Looks up a book by ISBN.
    #[must_use]
    pub fn book(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    /// Looks up a user by ID.
    #[must_use]
    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.get(user_id)
    }

    /// Returns the number of books in the catalog.
    #[must_use]
    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Returns the number of registered users.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Adds a book to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if a book with this ISBN exists, or a
    /// persistence error if the flush fails.
    pub fn add_book(&mut self, book: Book) -> CatalogResult<()> {
        if self.books.contains_key(book.isbn()) {
            return Err(CatalogError::duplicate_book(book.isbn().as_str()));
        }
        let isbn = book.isbn().clone();
        self.books.insert(isbn.clone(), book);
        self.flush()?;
        debug!(%isbn, "book added");
        Ok(())
    }

    /// Removes a book that is not on loan and returns it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown ISBN, `InvalidStateTransition` if
    /// the book is borrowed, or a persistence error if the flush fails.
    pub fn remove_book(&mut self, isbn: &str) -> CatalogResult<Book> {
        let book = self
            .books
            .get(isbn)
            .ok_or_else(|| CatalogError::book_not_found(isbn))?;
        if book.is_borrowed() {
            return Err(CatalogError::invalid_transition(format!(
                "book {isbn} is on loan and cannot be removed"
            )));
        }
        let book = self
            .books
            .shift_remove(isbn)
            .ok_or_else(|| CatalogError::book_not_found(isbn))?;
        self.flush()?;
        debug!(%isbn, "book removed");
        Ok(book)
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if the user ID is taken, or a
    /// persistence error if the flush fails.
    pub fn register_user(&mut self, user: User) -> CatalogResult<()> {
        if self.users.contains_key(user.user_id()) {
            return Err(CatalogError::duplicate_user(user.user_id().as_str()));
        }
        let user_id = user.user_id().clone();
        self.users.insert(user_id.clone(), user);
        self.flush()?;
        debug!(%user_id, "user registered");
        Ok(())
    }

    /// Removes a user with no outstanding loans and returns it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown user, `InvalidStateTransition` if
    /// the user still holds books, or a persistence error if the flush fails.
    pub fn remove_user(&mut self, user_id: &str) -> CatalogResult<User> {
        let user = self
            .users
            .get(user_id)
            .ok_or_else(|| CatalogError::user_not_found(user_id))?;
        if user.borrowed_count() > 0 {
            return Err(CatalogError::invalid_transition(format!(
                "user {user_id} still holds {} book(s)",
                user.borrowed_count()
            )));
        }
        let user = self
            .users
            .shift_remove(user_id)
            .ok_or_else(|| CatalogError::user_not_found(user_id))?;
        self.flush()?;
        debug!(%user_id, "user removed");
        Ok(user)
    }

    /// Lends a book to a user as of today. See [`Catalog::borrow_book_on`].
    ///
    /// # Errors
    ///
    /// See [`Catalog::borrow_book_on`].
    pub fn borrow_book(&mut self, isbn: &str, user_id: &str) -> CatalogResult<NaiveDate> {
        self.borrow_book_on(isbn, user_id, today())
    }

    /// Lends a book to a user on `date` and returns the due date.
    ///
    /// All preconditions are checked before anything changes, so the book
    /// and the user are either both updated or both left alone.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - `NotFound` for an unknown ISBN or user
    /// - `LimitExceeded` if the user already holds the maximum number of books
    /// - `InvalidStateTransition` if the book is already on loan, or the user
    ///   already lists it
    ///
    /// A persistence error means the loan was recorded in memory but not saved.
    pub fn borrow_book_on(
        &mut self,
        isbn: &str,
        user_id: &str,
        date: NaiveDate,
    ) -> CatalogResult<NaiveDate> {
        let book = self
            .books
            .get_mut(isbn)
            .ok_or_else(|| CatalogError::book_not_found(isbn))?;
        let user = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| CatalogError::user_not_found(user_id))?;

        if !user.can_borrow() {
            return Err(CatalogError::limit_exceeded(user_id));
        }
        if user.has_borrowed(isbn) {
            return Err(CatalogError::invalid_transition(format!(
                "user {user_id} already holds book {isbn}"
            )));
        }

        // Fails only if already borrowed, before touching either side.
        let due = book.borrow_on(date)?;
        user.add_borrowed_isbn(book.isbn().clone());

        self.flush()?;
        debug!(%isbn, %user_id, %due, "book borrowed");
        Ok(due)
    }

    /// Takes a book back from the user holding it.
    ///
    /// A loan left behind by inconsistent documents (the user lists the ISBN
    /// but the book is missing or not marked borrowed) is cleared from the
    /// user's side with a warning, so it can always be settled.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown ISBN or user,
    /// `InvalidStateTransition` if the user does not hold this book, or a
    /// persistence error if the flush fails.
    pub fn return_book(&mut self, isbn: &str, user_id: &str) -> CatalogResult<()> {
        let held = self.users.get(user_id).map(|user| user.has_borrowed(isbn));

        match (self.books.get_mut(isbn), held) {
            (None, Some(true)) => {
                warn!(%isbn, %user_id, "clearing loan of unknown book");
            }
            (None, _) => return Err(CatalogError::book_not_found(isbn)),
            (Some(_), None) => return Err(CatalogError::user_not_found(user_id)),
            (Some(_), Some(false)) => {
                return Err(CatalogError::invalid_transition(format!(
                    "user {user_id} does not hold book {isbn}"
                )));
            }
            (Some(book), Some(true)) => {
                if book.is_borrowed() {
                    book.return_book()?;
                } else {
                    warn!(%isbn, %user_id, "clearing loan of book not marked borrowed");
                }
            }
        }

        if let Some(user) = self.users.get_mut(user_id) {
            user.remove_borrowed_isbn(isbn);
        }

        self.flush()?;
        debug!(%isbn, %user_id, "book returned");
        Ok(())
    }

    /// Rewrites both documents from the in-memory state.
    ///
    /// Mutations call this automatically. Call it directly to retry after a
    /// `PersistenceWrite` error.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceWrite` naming the document that failed.
    pub fn flush(&mut self) -> CatalogResult<()> {
        write_document(self.book_store.as_mut(), &self.books)?;
        write_document(self.user_store.as_mut(), &self.users)?;
        debug!(
            books = self.books.len(),
            users = self.users.len(),
            "catalog flushed"
        );
        Ok(())
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("books", &self.books.len())
            .field("users", &self.users.len())
            .field("books_document", &self.book_store.describe())
            .field("users_document", &self.user_store.describe())
            .finish_non_exhaustive()
    }
}

/// Reads a keyed document. A missing document is an empty collection.
fn load_document<T: CatalogEntity>(
    backend: &dyn StorageBackend,
) -> CatalogResult<IndexMap<T::Id, T>> {
    let Some(bytes) = backend.read()? else {
        return Ok(IndexMap::new());
    };

    let DocumentEntries(raw) = serde_json::from_slice::<DocumentEntries<T>>(&bytes)
        .map_err(|e| CatalogError::load_json(backend.describe(), e))?;

    let mut entities: IndexMap<T::Id, T> = IndexMap::with_capacity(raw.len());
    for (key, entity) in raw {
        if entities.contains_key(key.as_str()) {
            return Err(CatalogError::load(
                backend.describe(),
                format!("{} key {key:?} appears more than once", T::KIND),
            ));
        }
        let id: &str = Borrow::<str>::borrow(entity.id());
        if key != id {
            return Err(CatalogError::load(
                backend.describe(),
                format!("{} stored under key {key:?} has id {id:?}", T::KIND),
            ));
        }
        entities.insert(entity.id().clone(), entity);
    }
    Ok(entities)
}

/// Every entry of a keyed document, in file order, duplicates included.
struct DocumentEntries<T>(Vec<(String, T)>);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for DocumentEntries<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
            type Value = DocumentEntries<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map keyed by identifier")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(DocumentEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

/// Serializes a keyed collection with four-space indentation and writes it.
fn write_document<K: Serialize, V: Serialize>(
    backend: &mut dyn StorageBackend,
    entities: &IndexMap<K, V>,
) -> CatalogResult<()> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    entities.serialize(&mut serializer)?;

    backend.write(&buf).map_err(|source| {
        let document = backend.describe();
        warn!(%document, error = %source, "flush failed");
        CatalogError::PersistenceWrite { document, source }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MAX_BORROW_LIMIT;
    use chrono::Days;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Catalog over probe-able memory backends.
    fn memory_catalog() -> (Catalog, InMemoryBackend, InMemoryBackend) {
        let books = InMemoryBackend::new();
        let users = InMemoryBackend::new();
        let catalog = Catalog::open_with_backends(
            CatalogConfig::default(),
            Box::new(books.clone()),
            Box::new(users.clone()),
        )
        .unwrap();
        (catalog, books, users)
    }

    fn stocked() -> Catalog {
        let mut catalog = Catalog::open_in_memory().unwrap();
        for (title, author, isbn) in [
            ("The Hobbit", "J.R.R. Tolkien", "111"),
            ("Dune", "Frank Herbert", "222"),
            ("Emma", "Jane Austen", "333"),
            ("Ulysses", "James Joyce", "444"),
        ] {
            catalog.add_book(Book::new(title, author, isbn)).unwrap();
        }
        catalog.register_user(User::new("Alice", "u1")).unwrap();
        catalog.register_user(User::new("Bob", "u2")).unwrap();
        catalog
    }

    #[test]
    fn open_in_memory_is_empty() {
        let catalog = Catalog::open_in_memory().unwrap();
        assert_eq!(catalog.book_count(), 0);
        assert_eq!(catalog.user_count(), 0);
    }

    #[test]
    fn add_book_flushes() {
        let (mut catalog, books, users) = memory_catalog();
        assert!(books.data().is_none());

        catalog.add_book(Book::new("Dune", "Frank Herbert", "222")).unwrap();

        let doc: serde_json::Value = serde_json::from_slice(&books.data().unwrap()).unwrap();
        assert_eq!(doc["222"]["title"], "Dune");
        assert_eq!(users.data().unwrap(), b"{}");
    }

    #[test]
    fn duplicate_book_rejected() {
        let mut catalog = stocked();
        let result = catalog.add_book(Book::new("Other", "Someone", "111"));
        assert!(matches!(
            result,
            Err(CatalogError::DuplicateIdentifier { .. })
        ));
        assert_eq!(catalog.book("111").unwrap().title(), "The Hobbit");
    }

    #[test]
    fn duplicate_user_rejected() {
        let mut catalog = stocked();
        let result = catalog.register_user(User::new("Impostor", "u1"));
        assert!(matches!(
            result,
            Err(CatalogError::DuplicateIdentifier { .. })
        ));
        assert_eq!(catalog.user("u1").unwrap().name(), "Alice");
    }

    #[test]
    fn borrow_and_return_scenario() {
        let mut catalog = stocked();
        let today = date(2024, 5, 1);

        let due = catalog.borrow_book_on("111", "u1", today).unwrap();
        assert_eq!(due, today + Days::new(14));
        assert!(catalog.book("111").unwrap().is_borrowed());
        assert!(catalog.user("u1").unwrap().has_borrowed("111"));

        let again = catalog.borrow_book_on("111", "u1", today);
        assert!(matches!(
            again,
            Err(CatalogError::InvalidStateTransition { .. })
        ));

        catalog.return_book("111", "u1").unwrap();
        assert!(!catalog.book("111").unwrap().is_borrowed());
        assert!(!catalog.user("u1").unwrap().has_borrowed("111"));

        let again = catalog.return_book("111", "u1");
        assert!(matches!(
            again,
            Err(CatalogError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn borrow_today_uses_local_date() {
        let mut catalog = stocked();
        let due = catalog.borrow_book("222", "u2").unwrap();
        assert_eq!(due, today() + Days::new(14));
    }

    #[test]
    fn borrow_unknown_ids() {
        let mut catalog = stocked();
        assert!(matches!(
            catalog.borrow_book("999", "u1"),
            Err(CatalogError::NotFound { .. })
        ));
        assert!(matches!(
            catalog.borrow_book("111", "nobody"),
            Err(CatalogError::NotFound { .. })
        ));
        assert!(!catalog.book("111").unwrap().is_borrowed());
    }

    #[test]
    fn fourth_borrow_exceeds_limit() {
        let mut catalog = stocked();
        for isbn in ["111", "222", "333"] {
            catalog.borrow_book(isbn, "u1").unwrap();
        }
        assert_eq!(catalog.user("u1").unwrap().borrowed_count(), MAX_BORROW_LIMIT);

        let result = catalog.borrow_book("444", "u1");
        assert!(matches!(
            result,
            Err(CatalogError::LimitExceeded { limit: 3, .. })
        ));
        assert!(!catalog.book("444").unwrap().is_borrowed());
        assert_eq!(catalog.user("u1").unwrap().borrowed_count(), 3);
    }

    #[test]
    fn limit_reported_even_for_unavailable_book() {
        let mut catalog = stocked();
        for isbn in ["111", "222", "333"] {
            catalog.borrow_book(isbn, "u1").unwrap();
        }
        catalog.return_book("333", "u1").unwrap();
        catalog.borrow_book("333", "u2").unwrap();
        catalog.borrow_book("444", "u1").unwrap();

        let result = catalog.borrow_book("333", "u1");
        assert!(matches!(result, Err(CatalogError::LimitExceeded { .. })));
    }

    #[test]
    fn return_by_wrong_user_fails() {
        let mut catalog = stocked();
        catalog.borrow_book("111", "u1").unwrap();

        let result = catalog.return_book("111", "u2");
        assert!(matches!(
            result,
            Err(CatalogError::InvalidStateTransition { .. })
        ));
        assert!(catalog.book("111").unwrap().is_borrowed());
        assert!(catalog.user("u1").unwrap().has_borrowed("111"));
    }

    #[test]
    fn remove_book_only_when_available() {
        let mut catalog = stocked();
        catalog.borrow_book("111", "u1").unwrap();

        assert!(matches!(
            catalog.remove_book("111"),
            Err(CatalogError::InvalidStateTransition { .. })
        ));
        assert!(matches!(
            catalog.remove_book("999"),
            Err(CatalogError::NotFound { .. })
        ));

        let removed = catalog.remove_book("222").unwrap();
        assert_eq!(removed.title(), "Dune");
        assert!(catalog.book("222").is_none());
        assert_eq!(catalog.book_count(), 3);
    }

    #[test]
    fn remove_user_only_without_loans() {
        let mut catalog = stocked();
        catalog.borrow_book("111", "u1").unwrap();

        assert!(matches!(
            catalog.remove_user("u1"),
            Err(CatalogError::InvalidStateTransition { .. })
        ));
        assert!(matches!(
            catalog.remove_user("ghost"),
            Err(CatalogError::NotFound { .. })
        ));

        catalog.return_book("111", "u1").unwrap();
        let removed = catalog.remove_user("u1").unwrap();
        assert_eq!(removed.name(), "Alice");
        assert_eq!(catalog.user_count(), 1);
    }

    #[test]
    fn removal_keeps_insertion_order() {
        let mut catalog = stocked();
        catalog.remove_book("222").unwrap();
        let order: Vec<&str> = catalog.books.keys().map(|k| k.as_str()).collect();
        assert_eq!(order, ["111", "333", "444"]);
    }

    #[test]
    fn rejected_operations_do_not_flush() {
        let (mut catalog, books, _users) = memory_catalog();
        catalog.add_book(Book::new("Dune", "Frank Herbert", "222")).unwrap();
        let before = books.data();

        books.set_fail_writes(true);
        assert!(catalog.add_book(Book::new("Dune", "x", "222")).is_err());
        assert!(catalog.remove_book("999").unwrap_err().is_rejection());
        assert_eq!(books.data(), before);
    }

    #[test]
    fn write_failure_keeps_mutation() {
        let (mut catalog, books, _users) = memory_catalog();
        books.set_fail_writes(true);

        let result = catalog.add_book(Book::new("Dune", "Frank Herbert", "222"));
        assert!(matches!(
            result,
            Err(CatalogError::PersistenceWrite { .. })
        ));
        assert!(catalog.book("222").is_some());
        assert!(books.data().is_none());

        books.set_fail_writes(false);
        catalog.flush().unwrap();
        assert!(books.data().is_some());
    }

    #[test]
    fn file_round_trip() {
        let dir = tempdir().unwrap();
        let config = CatalogConfig::in_dir(dir.path()).sync_on_write(false);

        {
            let mut catalog = Catalog::open(config.clone()).unwrap();
            catalog.add_book(Book::new("The Hobbit", "J.R.R. Tolkien", "111")).unwrap();
            catalog.add_book(Book::new("Dune", "Frank Herbert", "222")).unwrap();
            catalog.register_user(User::new("Alice", "u1")).unwrap();
            catalog.borrow_book_on("222", "u1", date(2024, 1, 10)).unwrap();
        }

        let catalog = Catalog::open(config).unwrap();
        assert_eq!(catalog.book_count(), 2);
        let dune = catalog.book("222").unwrap();
        assert_eq!(dune.due_date(), Some(date(2024, 1, 24)));
        assert_eq!(catalog.user("u1").unwrap().borrowed_isbns(), &[Isbn::new("222")]);
        let order: Vec<&str> = catalog.books.keys().map(|k| k.as_str()).collect();
        assert_eq!(order, ["111", "222"]);
        assert!(catalog.integrity_issues().is_empty());
    }

    #[test]
    fn documents_use_four_space_indent() {
        let (mut catalog, _books, users) = memory_catalog();
        catalog.register_user(User::new("Alice", "u1")).unwrap();

        let text = String::from_utf8(users.data().unwrap()).unwrap();
        assert!(text.starts_with("{\n    \"u1\": {\n        \"name\": \"Alice\""));
    }

    #[test]
    fn loads_legacy_documents() {
        let books = br#"{
    "111": {
        "title": "The Hobbit",
        "author": "J.R.R. Tolkien",
        "isbn": "111",
        "is_borrowed": true,
        "due_date": "2024-02-01"
    }
}"#;
        let users = br#"{"u1": {"name": "Alice", "user_id": "u1", "borrowed_books_isbns": ["111"]}}"#;

        let catalog = Catalog::open_with_backends(
            CatalogConfig::default(),
            Box::new(InMemoryBackend::with_data(books.to_vec())),
            Box::new(InMemoryBackend::with_data(users.to_vec())),
        )
        .unwrap();

        assert_eq!(catalog.book("111").unwrap().due_date(), Some(date(2024, 2, 1)));
        assert!(catalog.user("u1").unwrap().has_borrowed("111"));
    }

    #[test]
    fn malformed_document_is_fatal() {
        let result = Catalog::open_with_backends(
            CatalogConfig::default(),
            Box::new(InMemoryBackend::with_data(b"{not json".to_vec())),
            Box::new(InMemoryBackend::new()),
        );
        assert!(matches!(result, Err(CatalogError::PersistenceLoad { .. })));

        let result = Catalog::open_with_backends(
            CatalogConfig::default(),
            Box::new(InMemoryBackend::new()),
            Box::new(InMemoryBackend::with_data(b"[1, 2, 3]".to_vec())),
        );
        assert!(matches!(result, Err(CatalogError::PersistenceLoad { .. })));
    }

    #[test]
    fn mismatched_key_is_fatal() {
        let books = br#"{"999": {"title": "t", "author": "a", "isbn": "111", "is_borrowed": false, "due_date": null}}"#;
        let result = Catalog::open_with_backends(
            CatalogConfig::default(),
            Box::new(InMemoryBackend::with_data(books.to_vec())),
            Box::new(InMemoryBackend::new()),
        );
        match result {
            Err(CatalogError::PersistenceLoad { message, .. }) => {
                assert!(message.contains("999"));
            }
            other => panic!("expected load error, got {other:?}"),
        }
    }

    /// Opens a catalog over hand-written documents.
    fn from_documents(books: &str, users: &str) -> Catalog {
        Catalog::open_with_backends(
            CatalogConfig::default(),
            Box::new(InMemoryBackend::with_data(books.as_bytes().to_vec())),
            Box::new(InMemoryBackend::with_data(users.as_bytes().to_vec())),
        )
        .unwrap()
    }

    const HOBBIT_ON_SHELF: &str = r#"{"111": {"title": "The Hobbit", "author": "J.R.R. Tolkien",
        "isbn": "111", "is_borrowed": false, "due_date": null}}"#;

    #[test]
    fn borrow_of_book_user_already_lists_is_rejected() {
        let mut catalog = from_documents(
            HOBBIT_ON_SHELF,
            r#"{"u1": {"name": "Alice", "user_id": "u1", "borrowed_isbns": ["111"]}}"#,
        );

        let result = catalog.borrow_book_on("111", "u1", date(2024, 1, 1));
        assert!(matches!(
            result,
            Err(CatalogError::InvalidStateTransition { .. })
        ));
        assert!(!catalog.book("111").unwrap().is_borrowed());
        assert_eq!(catalog.user("u1").unwrap().borrowed_isbns().len(), 1);
    }

    #[test]
    fn return_clears_loan_of_unmarked_book() {
        let mut catalog = from_documents(
            HOBBIT_ON_SHELF,
            r#"{"u1": {"name": "Alice", "user_id": "u1", "borrowed_isbns": ["111"]}}"#,
        );
        assert_eq!(catalog.integrity_issues().len(), 1);

        catalog.return_book("111", "u1").unwrap();
        assert_eq!(catalog.user("u1").unwrap().borrowed_count(), 0);
        assert!(!catalog.book("111").unwrap().is_borrowed());
        assert!(catalog.integrity_issues().is_empty());

        catalog.borrow_book_on("111", "u1", date(2024, 1, 1)).unwrap();
    }

    #[test]
    fn return_clears_loan_of_unknown_book() {
        let mut catalog = from_documents(
            "{}",
            r#"{"u1": {"name": "Alice", "user_id": "u1", "borrowed_isbns": ["404"]}}"#,
        );

        catalog.return_book("404", "u1").unwrap();
        let user = catalog.remove_user("u1").unwrap();
        assert_eq!(user.borrowed_count(), 0);

        // Without a dangling loan an unknown ISBN is still not found.
        catalog.register_user(User::new("Bob", "u2")).unwrap();
        assert!(matches!(
            catalog.return_book("404", "u2"),
            Err(CatalogError::NotFound { .. })
        ));
    }

    #[test]
    fn malformed_document_keeps_parse_error() {
        use std::error::Error as _;

        let result = Catalog::open_with_backends(
            CatalogConfig::default(),
            Box::new(InMemoryBackend::with_data(b"{not json".to_vec())),
            Box::new(InMemoryBackend::new()),
        );
        let err = result.unwrap_err();
        assert!(err
            .source()
            .is_some_and(|source| source.is::<serde_json::Error>()));
    }

    #[test]
    fn repeated_key_is_fatal() {
        let users = r#"{
            "u1": {"name": "Alice", "user_id": "u1", "borrowed_isbns": []},
            "u1": {"name": "Alicia", "user_id": "u1", "borrowed_isbns": []}
        }"#;
        let result = Catalog::open_with_backends(
            CatalogConfig::default(),
            Box::new(InMemoryBackend::new()),
            Box::new(InMemoryBackend::with_data(users.as_bytes().to_vec())),
        );
        match result {
            Err(CatalogError::PersistenceLoad { message, source, .. }) => {
                assert!(message.contains("more than once"));
                assert!(source.is_none());
            }
            other => panic!("expected load error, got {other:?}"),
        }
    }

    #[test]
    fn debug_hides_backends() {
        let catalog = stocked();
        let text = format!("{catalog:?}");
        assert!(text.contains("books: 4"));
        assert!(text.contains("users: 2"));
    }
}
