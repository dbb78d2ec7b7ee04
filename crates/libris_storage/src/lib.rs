//! # Libris Storage
//!
//! Storage backend trait and implementations for Libris.
//!
//! A backend holds exactly one **opaque document**. It does not interpret
//! the bytes it stores; the catalog owns the JSON layout.
//!
//! ## Design Principles
//!
//! - A backend is a whole-document store (read everything, replace everything)
//! - A missing document is not an error, it reads back as `None`
//! - Must be `Send + Sync` so a catalog can move between threads
//! - Libris owns all document format interpretation
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral catalogs
//! - [`FileBackend`] - For persistent storage using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use libris_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! assert!(backend.read().unwrap().is_none());
//!
//! backend.write(b"{}").unwrap();
//! assert_eq!(backend.read().unwrap().as_deref(), Some(&b"{}"[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
