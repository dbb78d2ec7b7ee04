//! User entity.

use crate::entity::CatalogEntity;
use crate::error::EntityKind;
use crate::types::{Isbn, UserId, MAX_BORROW_LIMIT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered patron and the books they currently hold.
///
/// The ISBN list is kept in borrow order and never holds duplicates or more
/// than [`MAX_BORROW_LIMIT`] entries. Whether those ISBNs match borrowed
/// books is the catalog's business; a `User` on its own only guards its
/// own list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserRecord")]
pub struct User {
    name: String,
    user_id: UserId,
    borrowed_isbns: Vec<Isbn>,
}

impl User {
    /// Creates a new user with no loans.
    #[must_use]
    pub fn new(name: impl Into<String>, user_id: impl Into<UserId>) -> Self {
        Self {
            name: name.into(),
            user_id: user_id.into(),
            borrowed_isbns: Vec::new(),
        }
    }

    /// Returns the user's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the user ID.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the ISBNs of held books, oldest loan first.
    #[must_use]
    pub fn borrowed_isbns(&self) -> &[Isbn] {
        &self.borrowed_isbns
    }

    /// Returns the number of books held.
    #[must_use]
    pub fn borrowed_count(&self) -> usize {
        self.borrowed_isbns.len()
    }

    /// Returns whether the user holds `isbn`.
    #[must_use]
    pub fn has_borrowed(&self, isbn: &str) -> bool {
        self.borrowed_isbns.iter().any(|held| held.as_str() == isbn)
    }

    /// Returns whether the user is below the borrow limit.
    #[must_use]
    pub fn can_borrow(&self) -> bool {
        self.borrowed_isbns.len() < MAX_BORROW_LIMIT
    }

    /// Records a loan of `isbn`.
    ///
    /// Does nothing if the ISBN is already held or the user is at the limit.
    /// Returns whether the ISBN was added.
    pub(crate) fn add_borrowed_isbn(&mut self, isbn: Isbn) -> bool {
        if self.has_borrowed(isbn.as_str()) || !self.can_borrow() {
            return false;
        }
        self.borrowed_isbns.push(isbn);
        true
    }

    /// Forgets the loan of `isbn`. Returns whether it was held.
    pub(crate) fn remove_borrowed_isbn(&mut self, isbn: &str) -> bool {
        let before = self.borrowed_isbns.len();
        self.borrowed_isbns.retain(|held| held.as_str() != isbn);
        self.borrowed_isbns.len() != before
    }
}

impl CatalogEntity for User {
    type Id = UserId;
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &UserId {
        &self.user_id
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User: {} (ID: {}), Borrowed Books: {}",
            self.name,
            self.user_id,
            self.borrowed_isbns.len()
        )
    }
}

/// Persisted layout of a user.
#[derive(Debug, Deserialize)]
struct UserRecord {
    name: String,
    user_id: UserId,
    #[serde(default, alias = "borrowed_books_isbns")]
    borrowed_isbns: Vec<Isbn>,
}

impl TryFrom<UserRecord> for User {
    type Error = String;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        if record.borrowed_isbns.len() > MAX_BORROW_LIMIT {
            return Err(format!(
                "user {} holds {} books, limit is {}",
                record.user_id,
                record.borrowed_isbns.len(),
                MAX_BORROW_LIMIT
            ));
        }
        for (i, isbn) in record.borrowed_isbns.iter().enumerate() {
            if record.borrowed_isbns[..i].contains(isbn) {
                return Err(format!("user {} holds {} twice", record.user_id, isbn));
            }
        }
        Ok(Self {
            name: record.name,
            user_id: record.user_id,
            borrowed_isbns: record.borrowed_isbns,
        })
    }
}
