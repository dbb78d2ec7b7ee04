//! Storage backend trait definition.

use crate::error::StorageResult;

/// A whole-document storage backend for Libris.
///
/// Each backend stores a single document. The catalog keeps one backend for
/// books and one for users, and rewrites both after every mutation.
///
/// # Invariants
///
/// - `read` returns `None` until the first successful `write`
/// - `read` returns exactly the bytes of the last successful `write`
/// - A failed `write` leaves the previous document readable
/// - Backends must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Reads the whole document.
    ///
    /// Returns `Ok(None)` if the document does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be read.
    fn read(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the whole document with `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    fn write(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Returns whether a document has been stored.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined.
    fn exists(&self) -> StorageResult<bool> {
        Ok(self.read()?.is_some())
    }

    /// Returns a short human-readable location, used in log and error messages.
    fn describe(&self) -> String;
}
