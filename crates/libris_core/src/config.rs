//! Catalog configuration.

use std::path::{Path, PathBuf};

/// Default file name of the books document.
pub const DEFAULT_BOOKS_FILE: &str = "books.json";

/// Default file name of the users document.
pub const DEFAULT_USERS_FILE: &str = "users.json";

/// Configuration for opening a catalog.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Path of the books document.
    pub books_path: PathBuf,

    /// Path of the users document.
    pub users_path: PathBuf,

    /// Whether to create missing parent directories.
    pub create_dirs: bool,

    /// Whether to sync every flush to disk (safer but slower).
    pub sync_on_write: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            books_path: PathBuf::from(DEFAULT_BOOKS_FILE),
            users_path: PathBuf::from(DEFAULT_USERS_FILE),
            create_dirs: true,
            sync_on_write: true,
        }
    }
}

impl CatalogConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places both documents, with their default names, inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            books_path: dir.join(DEFAULT_BOOKS_FILE),
            users_path: dir.join(DEFAULT_USERS_FILE),
            ..Self::default()
        }
    }

    /// Sets the books document path.
    #[must_use]
    pub fn books_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.books_path = path.into();
        self
    }

    /// Sets the users document path.
    #[must_use]
    pub fn users_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.users_path = path.into();
        self
    }

    /// Sets whether to create missing parent directories.
    #[must_use]
    pub const fn create_dirs(mut self, value: bool) -> Self {
        self.create_dirs = value;
        self
    }

    /// Sets whether to sync every flush to disk.
    #[must_use]
    pub const fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }
}
