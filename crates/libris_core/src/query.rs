//! Read-only views over the catalog.
//!
//! Libris has no query language. Searches are a case-insensitive substring
//! match on title and author plus an exact ISBN match; everything else is
//! host-language iteration:
//!
//! ```rust
//! # use libris_core::{Book, Catalog};
//! # let mut catalog = Catalog::open_in_memory()?;
//! # catalog.add_book(Book::new("Dune", "Frank Herbert", "222"))?;
//! let herbert: Vec<&Book> = catalog
//!     .list_books(false)
//!     .filter(|book| book.author().ends_with("Herbert"))
//!     .collect();
//! assert_eq!(herbert.len(), 1);
//! # Ok::<(), libris_core::CatalogError>(())
//! ```

use crate::book::Book;
use crate::catalog::Catalog;
use crate::error::{CatalogError, CatalogResult};
use crate::user::User;

impl Catalog {
    /// Finds books whose title or author contains `query` (ignoring case),
    /// or whose ISBN equals `query` exactly.
    ///
    /// Results are in catalog order. An empty query matches every book.
    #[must_use]
    pub fn search_books(&self, query: &str) -> Vec<&Book> {
        let needle = query.to_lowercase();
        self.books
            .values()
            .filter(|book| book.matches(&needle, query))
            .collect()
    }

    /// Iterates over all books, or only those on the shelf.
    ///
    /// Each call starts a fresh pass over the catalog.
    pub fn list_books(&self, available_only: bool) -> impl Iterator<Item = &Book> + '_ {
        self.books
            .values()
            .filter(move |book| !available_only || !book.is_borrowed())
    }

    /// Iterates over all registered users.
    pub fn list_users(&self) -> impl Iterator<Item = &User> + '_ {
        self.users.values()
    }

    /// Iterates over the books a user holds, oldest loan first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown user.
    pub fn list_user_borrowed_books(
        &self,
        user_id: &str,
    ) -> CatalogResult<impl Iterator<Item = &Book> + '_> {
        let user = self
            .users
            .get(user_id)
            .ok_or_else(|| CatalogError::user_not_found(user_id))?;
        Ok(user
            .borrowed_isbns()
            .iter()
            .filter_map(|isbn| self.books.get(isbn)))
    }
}
