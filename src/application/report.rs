//! Statistics artifact assembly.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::aggregate::aggregate;
use crate::domain::{
    RecentPrediction, RecentStatus, ResolvedPrediction, StatsReport, UnresolvedPrediction,
    UnresolvedReason,
};
use crate::error::Result;
use crate::port::outbound::ledger::PredictionLedger;

/// Default cap on the recent-predictions list.
pub const DEFAULT_RECENT_LIMIT: usize = 20;

/// Build the stats artifact from the full ledger contents.
///
/// `pending` counts predictions still waiting on market data. `recent`
/// holds resolved and pending predictions, newest first, capped at
/// `recent_limit`.
#[must_use]
pub fn build_report(
    resolved: &[ResolvedPrediction],
    unresolved: &[UnresolvedPrediction],
    recent_limit: usize,
    now: DateTime<Utc>,
) -> StatsReport {
    let stats = aggregate(resolved);
    let pending: Vec<&UnresolvedPrediction> = unresolved
        .iter()
        .filter(|u| u.reason == UnresolvedReason::NoMarketData)
        .collect();

    let videos: HashSet<&str> = resolved
        .iter()
        .map(|r| r.prediction.video_id.as_str())
        .chain(unresolved.iter().map(|u| u.prediction.video_id.as_str()))
        .collect();

    let mut recent: Vec<RecentPrediction> = resolved
        .iter()
        .map(recent_resolved)
        .chain(pending.iter().map(|u| recent_pending(u)))
        .collect();
    recent.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    recent.truncate(recent_limit);

    StatsReport {
        generated_at: now,
        total_videos: videos.len() as u64,
        total_predictions: (resolved.len() + unresolved.len()) as u64,
        resolved: resolved.len() as u64,
        pending: pending.len() as u64,
        honey_count: stats.overall.honey_count,
        honey_index: stats.overall_index,
        asset_stats: stats.per_asset.into_values().collect(),
        recent,
    }
}

/// Load the ledger, build the report, and persist it.
///
/// # Errors
///
/// Returns an error if the ledger cannot be read or the artifact written.
pub async fn refresh_stats(
    ledger: &dyn PredictionLedger,
    recent_limit: usize,
    now: DateTime<Utc>,
) -> Result<StatsReport> {
    let resolved = ledger.load_resolved().await?;
    let unresolved = ledger.load_unresolved().await?;
    let report = build_report(&resolved, &unresolved, recent_limit, now);
    ledger.save_stats(&report).await?;
    Ok(report)
}

fn recent_resolved(r: &ResolvedPrediction) -> RecentPrediction {
    let p = &r.prediction;
    RecentPrediction {
        video_id: p.video_id.as_str().to_string(),
        title: p.title.clone(),
        thumbnail: p.thumbnail.clone(),
        published_at: p.published_at,
        asset: p.asset.clone(),
        predicted_direction: Some(r.verdict.predicted()),
        actual_direction: Some(r.verdict.actual()),
        price_change: Some(r.market.change_percent),
        is_honey: Some(r.is_honey()),
        status: if r.is_honey() {
            RecentStatus::Correct
        } else {
            RecentStatus::Incorrect
        },
    }
}

fn recent_pending(u: &UnresolvedPrediction) -> RecentPrediction {
    let p = &u.prediction;
    RecentPrediction {
        video_id: p.video_id.as_str().to_string(),
        title: p.title.clone(),
        thumbnail: p.thumbnail.clone(),
        published_at: p.published_at,
        asset: p.asset.clone(),
        predicted_direction: p.predicted_direction(),
        actual_direction: None,
        price_change: None,
        is_honey: None,
        status: RecentStatus::Pending,
    }
}
