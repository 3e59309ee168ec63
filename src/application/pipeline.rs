//! Collection run.
//!
//! ```text
//! VideoSource -> TitleClassifier -> fan_out -> PredictionResolver
//!                                                     |
//!                                  PredictionLedger <-+-> StatsReport
//! ```
//!
//! Everything produced by a run is committed in a single batch at the end.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::predictions::{fan_out, UnknownAssetPolicy};
use super::report::refresh_stats;
use super::resolver::PredictionResolver;
use crate::domain::{AssetRegistry, PredictionKey, Resolution, StatsReport};
use crate::error::Result;
use crate::port::outbound::classifier::TitleClassifier;
use crate::port::outbound::ledger::{CommitSummary, LedgerBatch, PredictionLedger};
use crate::port::outbound::video::VideoSource;

/// Knobs for one collection run.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub days: u32,
    pub unknown_assets: UnknownAssetPolicy,
    pub recent_limit: usize,
}

/// Counters from one collection run.
#[derive(Debug, Clone, Default)]
pub struct CollectSummary {
    pub videos: usize,
    /// Classifications that fell back after a failure.
    pub degraded: usize,
    pub predictions: usize,
    /// Predictions skipped because their key is already resolved.
    pub already_resolved: usize,
    pub resolved: usize,
    pub honey: usize,
    pub unresolved: usize,
    pub commit: CommitSummary,
}

pub struct CollectionPipeline {
    videos: Arc<dyn VideoSource>,
    classifier: Arc<dyn TitleClassifier>,
    registry: Arc<AssetRegistry>,
    resolver: Arc<PredictionResolver>,
    ledger: Arc<dyn PredictionLedger>,
    options: CollectOptions,
}

impl CollectionPipeline {
    pub fn new(
        videos: Arc<dyn VideoSource>,
        classifier: Arc<dyn TitleClassifier>,
        registry: Arc<AssetRegistry>,
        resolver: Arc<PredictionResolver>,
        ledger: Arc<dyn PredictionLedger>,
        options: CollectOptions,
    ) -> Self {
        Self {
            videos,
            classifier,
            registry,
            resolver,
            ledger,
            options,
        }
    }

    /// Run one collection at `now`, commit the results and refresh the
    /// stats artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the video source or the ledger fails.
    /// Classification and market-data failures never abort the run.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<(CollectSummary, StatsReport)> {
        let videos = self.videos.recent_videos(self.options.days).await?;
        info!(
            videos = videos.len(),
            classifier = self.classifier.name(),
            "Collection run started"
        );

        let resolved_keys: HashSet<PredictionKey> = self
            .ledger
            .load_resolved()
            .await?
            .iter()
            .map(|r| r.key())
            .collect();

        let mut summary = CollectSummary {
            videos: videos.len(),
            ..CollectSummary::default()
        };
        let mut batch = LedgerBatch::default();

        for video in &videos {
            let result = self.classifier.classify(video).await;
            if result.degraded {
                summary.degraded += 1;
            }

            let out = fan_out(
                video,
                &result,
                &self.registry,
                self.options.unknown_assets,
                now,
            );
            summary.predictions += out.predictions.len() + out.unknown.len();
            batch.unresolved.extend(out.unknown);

            for prediction in out.predictions {
                if resolved_keys.contains(&prediction.key()) {
                    debug!(key = %prediction.key(), "Already resolved");
                    summary.already_resolved += 1;
                    continue;
                }
                match self.resolver.resolve(prediction, now).await {
                    Resolution::Resolved(r) => {
                        summary.resolved += 1;
                        if r.is_honey() {
                            summary.honey += 1;
                        }
                        batch.resolved.push(r);
                    }
                    Resolution::Unresolved(u) => batch.unresolved.push(u),
                }
            }
        }
        summary.unresolved = batch.unresolved.len();

        summary.commit = self.ledger.commit(batch).await?;
        let report = refresh_stats(self.ledger.as_ref(), self.options.recent_limit, now).await?;

        info!(
            videos = summary.videos,
            predictions = summary.predictions,
            resolved = summary.resolved,
            honey = summary.honey,
            unresolved = summary.unresolved,
            honey_index = report.honey_index,
            "Collection run finished"
        );
        Ok((summary, report))
    }
}
