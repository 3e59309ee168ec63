//! Fake video source.

use async_trait::async_trait;

use crate::domain::Video;
use crate::error::{Error, Result};
use crate::port::outbound::video::VideoSource;

/// Returns a fixed list of videos regardless of the requested window.
#[derive(Default)]
pub struct FakeVideoSource {
    videos: Vec<Video>,
    failing: bool,
}

impl FakeVideoSource {
    pub fn new(videos: Vec<Video>) -> Self {
        Self {
            videos,
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            videos: Vec::new(),
            failing: true,
        }
    }
}

#[async_trait]
impl VideoSource for FakeVideoSource {
    async fn recent_videos(&self, _days: u32) -> Result<Vec<Video>> {
        if self.failing {
            return Err(Error::Upstream {
                status: 403,
                body: "quotaExceeded".into(),
            });
        }
        Ok(self.videos.clone())
    }
}
