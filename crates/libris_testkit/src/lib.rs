//! # Libris Testkit
//!
//! Test utilities for Libris.
//!
//! This crate provides:
//! - Catalog fixtures backed by memory or a temporary directory
//! - Pre-stocked catalog scenarios
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use libris_testkit::prelude::*;
//!
//! with_temp_catalog(|catalog| {
//!     assert_eq!(catalog.book_count(), 0);
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
