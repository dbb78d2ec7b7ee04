//! Cross-checks between users' loans and books' borrow state.
//!
//! The catalog never produces these inconsistencies itself, but documents
//! edited by hand or written by other tools can contain them.

use crate::catalog::Catalog;
use crate::types::{Isbn, UserId};
use std::collections::HashMap;
use std::fmt;

/// A disagreement between the books and users documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// A user holds an ISBN that is not in the catalog.
    UnknownBook {
        /// The holder.
        user_id: UserId,
        /// The missing ISBN.
        isbn: Isbn,
    },
    /// A user holds a book that is not marked as borrowed.
    NotMarkedBorrowed {
        /// The holder.
        user_id: UserId,
        /// The book.
        isbn: Isbn,
    },
    /// A book is marked as borrowed but no user holds it.
    NoHolder {
        /// The book.
        isbn: Isbn,
    },
    /// More than one user holds the same book.
    SharedLoan {
        /// The book.
        isbn: Isbn,
        /// Every user holding it.
        holders: Vec<UserId>,
    },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownBook { user_id, isbn } => {
                write!(f, "user {user_id} holds unknown book {isbn}")
            }
            Self::NotMarkedBorrowed { user_id, isbn } => {
                write!(f, "user {user_id} holds book {isbn}, which is not marked borrowed")
            }
            Self::NoHolder { isbn } => write!(f, "book {isbn} is borrowed but no user holds it"),
            Self::SharedLoan { isbn, holders } => {
                let holders: Vec<&str> = holders.iter().map(UserId::as_str).collect();
                write!(f, "book {isbn} is held by {}", holders.join(", "))
            }
        }
    }
}

impl Catalog {
    /// Returns every inconsistency between loans and borrow flags.
    ///
    /// An empty result means each borrowed book has exactly one holder and
    /// every held ISBN is a borrowed book.
    #[must_use]
    pub fn integrity_issues(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();
        let mut holders: HashMap<&Isbn, Vec<UserId>> = HashMap::new();

        for user in self.users.values() {
            for isbn in user.borrowed_isbns() {
                match self.books.get(isbn) {
                    None => issues.push(IntegrityIssue::UnknownBook {
                        user_id: user.user_id().clone(),
                        isbn: isbn.clone(),
                    }),
                    Some(book) if !book.is_borrowed() => {
                        issues.push(IntegrityIssue::NotMarkedBorrowed {
                            user_id: user.user_id().clone(),
                            isbn: isbn.clone(),
                        });
                    }
                    Some(_) => holders.entry(isbn).or_default().push(user.user_id().clone()),
                }
            }
        }

        for book in self.books.values().filter(|b| b.is_borrowed()) {
            match holders.remove(book.isbn()) {
                None => issues.push(IntegrityIssue::NoHolder {
                    isbn: book.isbn().clone(),
                }),
                Some(holders) if holders.len() > 1 => issues.push(IntegrityIssue::SharedLoan {
                    isbn: book.isbn().clone(),
                    holders,
                }),
                Some(_) => {}
            }
        }

        issues
    }
}
