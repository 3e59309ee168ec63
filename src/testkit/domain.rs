//! Builders for domain values used across tests.
//!
//! Every builder uses the same fixed publish instant so records compare
//! equal after a round trip through storage.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

use crate::domain::{
    AssetRegistry, ClassificationMethod, ClassificationResult, DetectedAsset, Direction,
    Granularity, Prediction, PriceWindow, ResolvedPrediction, Tone, ToneAnalysis,
    UnresolvedPrediction, UnresolvedReason, Verdict, Video, UNKNOWN_TICKER,
};

/// Publish instant shared by the builders: 2025-01-10 09:00 UTC.
pub fn published() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A video published at [`published`] with no thumbnail.
pub fn video(id: &str, title: &str) -> Video {
    Video::new(id, title, "", published())
}

/// A video published at `at`.
pub fn video_at(id: &str, title: &str, at: DateTime<Utc>) -> Video {
    Video::new(id, title, "", at)
}

/// A pattern-method classification naming `assets` with the given tone.
///
/// Tickers come from the built-in registry; unknown labels get
/// [`UNKNOWN_TICKER`].
pub fn classification(assets: &[&str], tone: Tone) -> ClassificationResult {
    let registry = AssetRegistry::builtin();
    let detected_assets = assets
        .iter()
        .map(|label| DetectedAsset {
            asset: (*label).to_string(),
            ticker: registry
                .get(label)
                .map_or_else(|| UNKNOWN_TICKER.to_string(), |a| a.ticker.clone()),
            matched_text: (*label).to_string(),
            confidence: 0.5,
            reasoning: String::new(),
        })
        .collect();

    ClassificationResult {
        method: ClassificationMethod::Pattern,
        model: None,
        classified_at: published(),
        detected_assets,
        tone_analysis: ToneAnalysis::model(tone, Vec::new(), "fixture"),
        degraded: false,
    }
}

/// A bullish prediction on `asset`.
pub fn prediction(video_id: &str, asset: &str) -> Prediction {
    prediction_at(video_id, asset, Tone::Positive, published())
}

/// A prediction with an explicit tone and publish time.
pub fn prediction_at(video_id: &str, asset: &str, tone: Tone, at: DateTime<Utc>) -> Prediction {
    Prediction::new(
        &video_at(video_id, "fixture title", at),
        asset,
        ToneAnalysis::model(tone, Vec::new(), "fixture"),
    )
    .with_method(ClassificationMethod::Pattern)
}

/// A resolved bullish call; the market fell when `is_honey`, rose otherwise.
pub fn resolved(video_id: &str, asset: &str, is_honey: bool) -> ResolvedPrediction {
    resolved_at(video_id, asset, is_honey, published())
}

/// Like [`resolved`], published at `at`.
pub fn resolved_at(
    video_id: &str,
    asset: &str,
    is_honey: bool,
    at: DateTime<Utc>,
) -> ResolvedPrediction {
    let after = if is_honey { dec!(90) } else { dec!(110) };
    let market = PriceWindow::from_prices(asset, dec!(100), after, Granularity::Hourly, None)
        .unwrap_or_else(|| unreachable!("positive starting price"));
    let actual = if is_honey {
        Direction::Bearish
    } else {
        Direction::Bullish
    };

    ResolvedPrediction {
        prediction: prediction_at(video_id, asset, Tone::Positive, at),
        market,
        verdict: Verdict::new(Direction::Bullish, actual),
        explanation: format!("bullish call, market {actual}"),
        resolved_at: at + Duration::hours(24),
    }
}

/// An unresolved bullish call with the given reason.
pub fn unresolved(video_id: &str, asset: &str, reason: UnresolvedReason) -> UnresolvedPrediction {
    UnresolvedPrediction::new(prediction(video_id, asset), reason, published())
}
