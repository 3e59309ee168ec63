//! SQLite classification cache.
//!
//! Point reads and insert-or-ignore writes against `classification_cache`.
//! The primary key is the `"{video_id}_{title}"` cache key, so concurrent
//! writers for the same key cannot overwrite each other.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::CacheRow;
use crate::adapter::outbound::sqlite::database::schema::classification_cache;
use crate::domain::{CacheKey, ClassificationMethod, ClassificationResult, Video};
use crate::error::{Error, Result};
use crate::port::outbound::cache::ClassificationCache;

/// SQLite-backed [`ClassificationCache`].
pub struct SqliteClassificationCache {
    pool: DbPool,
}

impl SqliteClassificationCache {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(key: &CacheKey, video: &Video, result: &ClassificationResult) -> Result<CacheRow> {
        Ok(CacheRow {
            cache_key: key.as_str().to_string(),
            video_id: video.id.as_str().to_string(),
            title: video.title.clone(),
            method: match result.method {
                ClassificationMethod::Pattern => "pattern",
                ClassificationMethod::Llm => "llm",
            }
            .to_string(),
            payload: serde_json::to_string(result)?,
            created_at: Utc::now().to_rfc3339(),
        })
    }

    /// Number of cached entries.
    ///
    /// # Errors
    /// Returns an error if the table cannot be read.
    pub fn count(&self) -> Result<i64> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        classification_cache::table
            .count()
            .get_result(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))
    }
}

#[async_trait]
impl ClassificationCache for SqliteClassificationCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<ClassificationResult>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let row: Option<CacheRow> = classification_cache::table
            .find(key.as_str())
            .select(CacheRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        row.map(|r| serde_json::from_str(&r.payload).map_err(Error::from))
            .transpose()
    }

    async fn put(
        &self,
        key: &CacheKey,
        video: &Video,
        result: &ClassificationResult,
    ) -> Result<bool> {
        let row = Self::to_row(key, video, result)?;
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let inserted = diesel::insert_or_ignore_into(classification_cache::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(inserted > 0)
    }
}
