//! # Libris Core
//!
//! Catalog engine for Libris.
//!
//! This crate provides:
//! - [`Book`] and [`User`] entities with explicit borrow/return transitions
//! - [`Catalog`], which owns both collections and records loans on both
//!   sides at once
//! - Search, listings, the overdue report and summary statistics
//! - Whole-document JSON persistence through [`libris_storage`] backends
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use libris_core::{Book, Catalog, User};
//!
//! let mut catalog = Catalog::open_in_memory()?;
//! catalog.add_book(Book::new("The Hobbit", "J.R.R. Tolkien", "111"))?;
//! catalog.register_user(User::new("Alice", "u1"))?;
//!
//! let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
//! let due = catalog.borrow_book_on("111", "u1", monday)?;
//! assert_eq!(due, NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
//!
//! let late = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
//! let fees: u64 = catalog.overdue_report(late).map(|entry| entry.fee).sum();
//! assert_eq!(fees, 10);
//! # Ok::<(), libris_core::CatalogError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod book;
mod catalog;
mod config;
mod entity;
mod error;
mod integrity;
mod query;
mod report;
pub mod types;
mod user;

pub use book::Book;
pub use catalog::Catalog;
pub use config::{CatalogConfig, DEFAULT_BOOKS_FILE, DEFAULT_USERS_FILE};
pub use entity::CatalogEntity;
pub use error::{CatalogError, CatalogResult, EntityKind};
pub use integrity::IntegrityIssue;
pub use report::{CatalogStats, OverdueEntry};
pub use types::{Isbn, UserId, LATE_FEE_PER_DAY, LOAN_PERIOD_DAYS, MAX_BORROW_LIMIT};
pub use user::User;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
