//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Video identifier - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Create a new `VideoId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the video ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Ledger key of a prediction: one video may carry calls on several assets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PredictionKey {
    pub video_id: VideoId,
    pub asset: String,
}

impl PredictionKey {
    /// Create a key from a video ID and an asset label.
    pub fn new(video_id: impl Into<VideoId>, asset: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            asset: asset.into(),
        }
    }
}

impl fmt::Display for PredictionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.video_id, self.asset)
    }
}

/// Cache key of a model-backed classification.
///
/// Keyed by video ID *and* title so a retitled video gets a fresh entry
/// instead of overwriting the old one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build the key for a video ID and title pair.
    #[must_use]
    pub fn new(video_id: &VideoId, title: &str) -> Self {
        Self(format!("{}_{}", video_id.as_str(), title))
    }

    /// Get the cache key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
