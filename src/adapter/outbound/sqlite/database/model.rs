//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::classification_cache;

/// Database row for a cached classification.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = classification_cache)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CacheRow {
    pub cache_key: String,
    pub video_id: String,
    pub title: String,
    pub method: String,
    /// Serialized `ClassificationResult`.
    pub payload: String,
    pub created_at: String,
}
