//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::sync::Arc;

/// An in-memory storage backend.
///
/// This backend keeps the document in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral catalogs that don't need persistence
///
/// Clones share the same document, so a test can hand one clone to a
/// catalog and inspect what was written through the other.
///
/// # Example
///
/// ```rust
/// use libris_storage::{StorageBackend, InMemoryBackend};
///
/// let probe = InMemoryBackend::new();
/// let mut backend = probe.clone();
/// backend.write(b"test data").unwrap();
/// assert_eq!(probe.data().as_deref(), Some(&b"test data"[..]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    data: Arc<RwLock<Option<Vec<u8>>>>,
    fail_writes: Arc<RwLock<bool>>,
}

impl InMemoryBackend {
    /// Creates a new backend with no document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with a pre-existing document.
    ///
    /// Useful for testing load scenarios.
    #[must_use]
    pub fn with_data(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Arc::new(RwLock::new(Some(data.into()))),
            fail_writes: Arc::default(),
        }
    }

    /// Returns a copy of the stored document.
    #[must_use]
    pub fn data(&self) -> Option<Vec<u8>> {
        self.data.read().clone()
    }

    /// Removes the stored document.
    pub fn clear(&mut self) {
        *self.data.write() = None;
    }

    /// Makes every subsequent write fail with an I/O error.
    ///
    /// Useful for testing write-failure handling.
    pub fn set_fail_writes(&self, value: bool) {
        *self.fail_writes.write() = value;
    }
}

impl StorageBackend for InMemoryBackend {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.data.read().clone())
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<()> {
        if *self.fail_writes.read() {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "simulated write failure",
            )));
        }
        *self.data.write() = Some(data.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
