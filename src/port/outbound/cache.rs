//! Classification cache port.

use async_trait::async_trait;

use crate::domain::{CacheKey, ClassificationResult, Video};
use crate::error::Result;

/// Durable key-value store for model-backed classification results.
///
/// Entries are immutable: `put` on an existing key leaves the stored result
/// untouched.
#[async_trait]
pub trait ClassificationCache: Send + Sync {
    /// Point read.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the entry is corrupt.
    async fn get(&self, key: &CacheKey) -> Result<Option<ClassificationResult>>;

    /// Insert if absent. Returns `true` when a new entry was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    async fn put(&self, key: &CacheKey, video: &Video, result: &ClassificationResult)
        -> Result<bool>;
}
