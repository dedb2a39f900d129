//! Local page store for the catalog pipeline.
//!
//! This crate provides the cache that sits between the remote catalog and
//! everything that displays it. The cache is not the source of truth - the
//! remote catalog is. If the database is deleted, it is repopulated page by
//! page as pages are requested again.
//!
//! # Architecture
//! - [`LocalStore`] is the interface the pipeline consumes: point reads and
//!   writes of pages keyed by [`PageKey`](reel_catalog::PageKey), the highest
//!   cached page of a filter, and a change-notification channel.
//! - [`SqliteStore`] implements it on top of a single `pages` table, one
//!   namespace per content context, items serialized as JSON.
//! - [`MemoryStore`] (feature `mock`) implements it in memory, with failure
//!   injection for tests.

mod db;
pub mod error;
#[cfg(any(test, feature = "mock"))]
mod memory;
mod models;
mod sqlite;
mod store;

pub use crate::db::Database;
#[cfg(any(test, feature = "mock"))]
pub use crate::memory::MemoryStore;
pub use crate::sqlite::SqliteStore;
pub use crate::store::{LocalStore, Notifications, StoreHandle};
