//! Memoizing decorator for expensive classifiers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::{CacheKey, ClassificationResult, Video};
use crate::port::outbound::cache::ClassificationCache;
use crate::port::outbound::classifier::TitleClassifier;

/// Wraps a classifier with a durable cache keyed by (video id, title).
///
/// A hit bypasses the inner classifier entirely. Degraded results are not
/// stored, so a failed call is retried on the next run. Cache failures are
/// logged and otherwise ignored.
pub struct CachedClassifier {
    inner: Arc<dyn TitleClassifier>,
    cache: Arc<dyn ClassificationCache>,
}

impl CachedClassifier {
    pub fn new(inner: Arc<dyn TitleClassifier>, cache: Arc<dyn ClassificationCache>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl TitleClassifier for CachedClassifier {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn classify(&self, video: &Video) -> ClassificationResult {
        let key = CacheKey::new(&video.id, &video.title);

        match self.cache.get(&key).await {
            Ok(Some(hit)) => {
                debug!(video_id = %video.id, "classification cache hit");
                return hit;
            }
            Ok(None) => {}
            Err(e) => warn!(video_id = %video.id, error = %e, "classification cache read failed"),
        }

        let result = self.inner.classify(video).await;
        if result.degraded {
            return result;
        }

        if let Err(e) = self.cache.put(&key, video, &result).await {
            warn!(video_id = %video.id, error = %e, "classification cache write failed");
        }
        result
    }
}
