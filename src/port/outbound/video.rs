//! Video source port.

use async_trait::async_trait;

use crate::domain::Video;
use crate::error::Result;

/// Supplies the tracked channel's recent uploads.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Videos published within the trailing `days`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream API fails.
    async fn recent_videos(&self, days: u32) -> Result<Vec<Video>>;
}
