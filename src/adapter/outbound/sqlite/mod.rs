//! SQLite persistence adapters.
//!
//! Provides the SQLite-backed classification cache using Diesel ORM.

pub mod cache;
pub mod database;

pub use cache::SqliteClassificationCache;
