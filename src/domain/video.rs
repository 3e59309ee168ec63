//! Video records supplied by the video source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::VideoId;

/// An immutable external video record.
///
/// Collected once per run and never mutated afterwards; every prediction
/// derived from a video copies the fields it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    pub published_at: DateTime<Utc>,
}

impl Video {
    /// Create a new video record.
    pub fn new(
        id: impl Into<VideoId>,
        title: impl Into<String>,
        thumbnail: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            thumbnail: thumbnail.into(),
            published_at,
        }
    }
}
