//! YouTube Data API v3 video source.
//!
//! Resolves the channel's uploads playlist, then pages through
//! `playlistItems` newest first until an item older than the cutoff shows up
//! or the listing runs out.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::Video;
use crate::error::{Error, Result};
use crate::port::outbound::video::VideoSource;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const PAGE_SIZE: &str = "50";
const VIDEO_KIND: &str = "youtube#video";

/// Uploads of one channel, fetched through the Data API.
pub struct YouTubeVideos {
    http: HttpClient,
    base_url: String,
    api_key: String,
    channel_id: String,
}

impl YouTubeVideos {
    pub fn new(api_key: impl Into<String>, channel_id: impl Into<String>) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            channel_id: channel_id.into(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, resource: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self
            .http
            .get(format!("{}/{resource}", self.base_url))
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    async fn uploads_playlist(&self) -> Result<String> {
        let channels: ChannelList = self
            .get(
                "channels",
                &[("part", "contentDetails"), ("id", self.channel_id.as_str())],
            )
            .await?;
        channels
            .items
            .into_iter()
            .next()
            .map(|c| c.content_details.related_playlists.uploads)
            .ok_or_else(|| Error::Parse(format!("channel {} not found", self.channel_id)))
    }
}

#[async_trait]
impl VideoSource for YouTubeVideos {
    async fn recent_videos(&self, days: u32) -> Result<Vec<Video>> {
        let playlist = self.uploads_playlist().await?;
        let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
        info!(playlist = %playlist, days, cutoff = %cutoff, "Fetching recent uploads");

        let mut videos = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query = vec![
                ("part", "snippet"),
                ("playlistId", playlist.as_str()),
                ("maxResults", PAGE_SIZE),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let page: PlaylistPage = self.get("playlistItems", &query).await?;

            let reached_cutoff = collect_page(&page.items, cutoff, &mut videos);
            debug!(fetched = videos.len(), "Playlist page processed");

            match page.next_page_token {
                Some(next) if !reached_cutoff => page_token = Some(next),
                _ => break,
            }
        }

        info!(count = videos.len(), "Recent uploads fetched");
        Ok(videos)
    }
}

/// Append in-window videos from one page. Returns true once an item older
/// than `cutoff` is seen.
fn collect_page(items: &[PlaylistItem], cutoff: DateTime<Utc>, out: &mut Vec<Video>) -> bool {
    for item in items {
        let snippet = &item.snippet;
        if snippet.resource_id.kind != VIDEO_KIND {
            continue;
        }
        if snippet.published_at < cutoff {
            return true;
        }
        let thumbnail = snippet
            .thumbnails
            .high
            .as_ref()
            .or(snippet.thumbnails.medium.as_ref())
            .map(|t| t.url.clone())
            .unwrap_or_default();
        out.push(Video::new(
            snippet.resource_id.video_id.clone().unwrap_or_default(),
            snippet.title.clone(),
            thumbnail,
            snippet.published_at,
        ));
    }
    false
}

#[derive(Deserialize)]
struct ChannelList {
    #[serde(default)]
    items: Vec<Channel>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Channel {
    content_details: ContentDetails,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentDetails {
    related_playlists: RelatedPlaylists,
}

#[derive(Deserialize)]
struct RelatedPlaylists {
    uploads: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistPage {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct PlaylistItem {
    snippet: Snippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    published_at: DateTime<Utc>,
    title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
    resource_id: ResourceId,
}

#[derive(Deserialize, Default)]
struct Thumbnails {
    #[serde(default)]
    high: Option<Thumbnail>,
    #[serde(default)]
    medium: Option<Thumbnail>,
}

#[derive(Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    kind: String,
    #[serde(default)]
    video_id: Option<String>,
}
