//! Collection and resolution settings.

use serde::Deserialize;

use crate::application::predictions::UnknownAssetPolicy;
use crate::application::report::DEFAULT_RECENT_LIMIT;

/// Channel tracked when none is configured.
pub const DEFAULT_CHANNEL_ID: &str = "UCznImSIaxZR7fdLCICLdgaQ";

/// Title classification strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Keyword and regex matching, no network.
    #[default]
    Pattern,
    /// Language-model extraction behind the classification cache.
    Llm,
}

/// `[collection]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// YouTube channel whose uploads are tracked.
    pub channel_id: String,
    /// Trailing window of videos fetched per run.
    pub days: u32,
    pub strategy: Strategy,
    pub unknown_assets: UnknownAssetPolicy,
    /// Cap on the recent-predictions list in the stats artifact.
    pub recent_limit: usize,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            channel_id: DEFAULT_CHANNEL_ID.into(),
            days: 30,
            strategy: Strategy::default(),
            unknown_assets: UnknownAssetPolicy::default(),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

/// `[resolution]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Hours between publish and the second price sample.
    pub window_hours: u32,
}

impl ResolutionConfig {
    #[must_use]
    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.window_hours))
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self { window_hours: 24 }
    }
}
