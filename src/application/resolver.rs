//! Prediction resolver.
//!
//! Turns a [`Prediction`] into a verdict once its window has elapsed and
//! market data is available. Checks run in a fixed order:
//!
//! 1. window not elapsed: `no_market_data`
//! 2. asset missing from the registry: `unknown_asset`
//! 3. market lookup failed: `no_market_data`
//! 4. no tone attached: `no_tone`
//! 5. neutral tone: `neutral_tone`
//! 6. flat market: `flat_market`
//!
//! Anything that passes all six resolves with `is_honey = predicted != actual`.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::domain::{
    AssetRegistry, Prediction, PriceWindow, Resolution, ResolvedPrediction, ToneAnalysis,
    UnresolvedPrediction, UnresolvedReason, Verdict,
};
use crate::port::outbound::market::MarketData;

/// Resolves predictions against a market-data source.
pub struct PredictionResolver {
    market: Arc<dyn MarketData>,
    registry: Arc<AssetRegistry>,
    window: Duration,
}

impl PredictionResolver {
    pub fn new(market: Arc<dyn MarketData>, registry: Arc<AssetRegistry>, window: Duration) -> Self {
        Self {
            market,
            registry,
            window,
        }
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Attempt to resolve one prediction at `now`.
    pub async fn resolve(&self, prediction: Prediction, now: DateTime<Utc>) -> Resolution {
        let unresolved = |prediction: Prediction, reason: UnresolvedReason| {
            Resolution::Unresolved(UnresolvedPrediction::new(prediction, reason, now))
        };

        if !prediction.is_due(self.window, now) {
            debug!(key = %prediction.key(), "Window not elapsed");
            return unresolved(prediction, UnresolvedReason::NoMarketData);
        }

        let Some(asset) = self.registry.get(&prediction.asset) else {
            return unresolved(prediction, UnresolvedReason::UnknownAsset);
        };

        let Some(market) = self
            .market
            .price_window(asset, prediction.published_at, self.window)
            .await
        else {
            warn!(key = %prediction.key(), ticker = %asset.ticker, "No market data");
            return unresolved(prediction, UnresolvedReason::NoMarketData);
        };

        let Some(tone) = prediction.tone.clone() else {
            return unresolved(prediction, UnresolvedReason::NoTone);
        };
        let Some(predicted) = tone.direction() else {
            return unresolved(prediction, UnresolvedReason::NeutralTone);
        };
        let Some(actual) = market.movement.direction() else {
            return unresolved(prediction, UnresolvedReason::FlatMarket);
        };

        let verdict = Verdict::new(predicted, actual);
        let explanation = explain(&tone, &market, &verdict);
        debug!(key = %prediction.key(), is_honey = verdict.is_honey(), "Resolved");

        Resolution::Resolved(ResolvedPrediction {
            prediction,
            market,
            verdict,
            explanation,
            resolved_at: now,
        })
    }
}

fn explain(tone: &ToneAnalysis, market: &PriceWindow, verdict: &Verdict) -> String {
    let outcome = if verdict.is_honey() {
        "honey"
    } else {
        "call held"
    };
    format!(
        "{} tone predicted {}; {} moved {} ({}%): {outcome}",
        tone.tone,
        verdict.predicted(),
        market.ticker,
        market.movement.as_str(),
        market.change_percent.normalize(),
    )
}
