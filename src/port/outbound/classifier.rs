//! Title classification port.

use async_trait::async_trait;

use crate::domain::{ClassificationResult, Video};

/// Maps a video title to detected assets and a tone verdict.
///
/// Classification never fails from the caller's point of view: strategies
/// that can fail return [`ClassificationResult::fallback`] instead, with
/// `degraded` set.
#[async_trait]
pub trait TitleClassifier: Send + Sync {
    /// Strategy name for logging.
    fn name(&self) -> &'static str;

    /// Classify one video's title.
    async fn classify(&self, video: &Video) -> ClassificationResult;
}
