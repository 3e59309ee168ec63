//! Statistics domain types.
//!
//! DTOs produced by the aggregator and persisted as the stats artifact.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::tone::Direction;

/// Honey count over a set of resolved predictions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub total: u64,
    pub honey_count: u64,
}

impl Tally {
    pub fn record(&mut self, is_honey: bool) {
        self.total += 1;
        if is_honey {
            self.honey_count += 1;
        }
    }

    /// Honey index in percent; 0 when nothing was counted.
    #[must_use]
    pub fn index(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.honey_count as f64 / self.total as f64 * 100.0
        }
    }
}

/// Per-asset row of the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetStats {
    pub asset: String,
    pub total: u64,
    pub honey_count: u64,
    pub honey_index: f64,
}

impl AssetStats {
    pub fn from_tally(asset: impl Into<String>, tally: Tally) -> Self {
        Self {
            asset: asset.into(),
            total: tally.total,
            honey_count: tally.honey_count,
            honey_index: tally.index(),
        }
    }
}

/// Overall and per-asset honey index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoneyStats {
    pub overall: Tally,
    pub overall_index: f64,
    pub per_asset: BTreeMap<String, AssetStats>,
}

/// Status of a row in the recent-predictions list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecentStatus {
    /// The contrarian read paid off: the market moved against the call.
    Correct,
    /// The market moved with the call.
    Incorrect,
    /// Not resolved yet.
    Pending,
}

/// One row of the recent-predictions list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentPrediction {
    pub video_id: String,
    pub title: String,
    pub thumbnail: String,
    pub published_at: DateTime<Utc>,
    pub asset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_change: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_honey: Option<bool>,
    pub status: RecentStatus,
}

/// The aggregate statistics artifact written after each run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub generated_at: DateTime<Utc>,
    pub total_videos: u64,
    pub total_predictions: u64,
    pub resolved: u64,
    pub pending: u64,
    pub honey_count: u64,
    pub honey_index: f64,
    pub asset_stats: Vec<AssetStats>,
    pub recent: Vec<RecentPrediction>,
}
