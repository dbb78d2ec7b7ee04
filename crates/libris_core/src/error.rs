//! Error types for Libris core.

use crate::types::MAX_BORROW_LIMIT;
use libris_storage::StorageError;
use std::fmt;
use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// The kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A catalog book, identified by ISBN.
    Book,
    /// A registered user, identified by user ID.
    User,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Book => f.write_str("book"),
            Self::User => f.write_str("user"),
        }
    }
}

/// Errors that can occur in catalog operations.
///
/// The first four variants are ordinary business-rule rejections: the
/// catalog is unchanged when one of them is returned. The rest are
/// persistence faults.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An entity with this identifier already exists.
    #[error("{kind} already exists: {id}")]
    DuplicateIdentifier {
        /// Kind of entity.
        kind: EntityKind,
        /// The conflicting identifier.
        id: String,
    },

    /// No entity with this identifier exists.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of entity.
        kind: EntityKind,
        /// The identifier that was not found.
        id: String,
    },

    /// The operation is not allowed in the entity's current state.
    #[error("invalid state transition: {message}")]
    InvalidStateTransition {
        /// Description of why the transition is invalid.
        message: String,
    },

    /// The user already holds the maximum number of books.
    #[error("borrow limit exceeded: user {user_id} already holds {limit} books")]
    LimitExceeded {
        /// The user at the limit.
        user_id: String,
        /// The limit that applies.
        limit: usize,
    },

    /// A persisted document exists but does not have the expected shape.
    #[error("failed to load {document}: {message}")]
    PersistenceLoad {
        /// Location of the document.
        document: String,
        /// Description of the problem.
        message: String,
        /// The parse error, when the document is not valid JSON for its shape.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Writing a document failed. The in-memory change is kept.
    #[error("failed to write {document}: {source}")]
    PersistenceWrite {
        /// Location of the document.
        document: String,
        /// The underlying storage error.
        #[source]
        source: StorageError,
    },

    /// Storage backend error while opening or reading.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization of the catalog failed.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CatalogError {
    /// Creates a duplicate book error.
    pub fn duplicate_book(isbn: impl Into<String>) -> Self {
        Self::DuplicateIdentifier {
            kind: EntityKind::Book,
            id: isbn.into(),
        }
    }

    /// Creates a duplicate user error.
    pub fn duplicate_user(user_id: impl Into<String>) -> Self {
        Self::DuplicateIdentifier {
            kind: EntityKind::User,
            id: user_id.into(),
        }
    }

    /// Creates a book not found error.
    pub fn book_not_found(isbn: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Book,
            id: isbn.into(),
        }
    }

    /// Creates a user not found error.
    pub fn user_not_found(user_id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::User,
            id: user_id.into(),
        }
    }

    /// Creates an invalid state transition error.
    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::InvalidStateTransition {
            message: message.into(),
        }
    }

    /// Creates a borrow limit error for the given user.
    pub fn limit_exceeded(user_id: impl Into<String>) -> Self {
        Self::LimitExceeded {
            user_id: user_id.into(),
            limit: MAX_BORROW_LIMIT,
        }
    }

    /// Creates a load error for a malformed document.
    pub fn load(document: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PersistenceLoad {
            document: document.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a load error for a document that failed to parse.
    pub fn load_json(document: impl Into<String>, source: serde_json::Error) -> Self {
        Self::PersistenceLoad {
            document: document.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Returns true for expected business-rule rejections.
    ///
    /// Rejections leave the catalog untouched; everything else is a
    /// persistence fault.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::DuplicateIdentifier { .. }
                | Self::NotFound { .. }
                | Self::InvalidStateTransition { .. }
                | Self::LimitExceeded { .. }
        )
    }
}
