//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A file-based storage backend.
///
/// The document lives in a single file. Writes go to a sibling temp file
/// which is then renamed over the target, so a reader never sees a
/// half-written document from this process.
///
/// # Durability
///
/// - With `sync_on_write` enabled, the temp file is `sync_all`ed before the rename
/// - Without it, the data is handed to the OS and flushed lazily
///
/// # Example
///
/// ```no_run
/// use libris_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("books.json")).unwrap();
/// backend.write(b"{}").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    sync_on_write: bool,
}

impl FileBackend {
    /// Opens a file backend at the given path.
    ///
    /// The file is not created until the first write. The parent directory
    /// must already exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the path exists but is not a regular file.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if path.exists() && !path.is_file() {
            return Err(StorageError::corrupted(format!(
                "not a regular file: {}",
                path.display()
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            sync_on_write: true,
        })
    }

    /// Opens a file backend, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the path is not a file.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::open(path)
    }

    /// Sets whether every write is synced to disk before it replaces the document.
    #[must_use]
    pub fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StorageBackend for FileBackend {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<()> {
        let temp_path = self.temp_path();

        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        if self.sync_on_write {
            file.sync_all()?;
        }
        drop(file);

        // Atomic rename
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        Ok(())
    }

    fn exists(&self) -> StorageResult<bool> {
        Ok(self.path.is_file())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
