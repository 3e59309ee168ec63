//! Predictions and their verdicts.
//!
//! A [`Prediction`] is one (video, asset) forecast. Resolution turns it into
//! either a [`ResolvedPrediction`] (terminal, carries `is_honey`) or an
//! [`UnresolvedPrediction`] tagged with a machine-readable reason.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::classification::ClassificationMethod;
use super::id::{PredictionKey, VideoId};
use super::market::PriceWindow;
use super::tone::{Direction, ToneAnalysis};
use super::video::Video;

/// A forecast on one asset taken from one video title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub video_id: VideoId,
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    pub published_at: DateTime<Utc>,
    /// Registry label of the asset.
    pub asset: String,
    /// Tone attached at classification time. Legacy records may lack it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<ToneAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<ClassificationMethod>,
    /// Classifier confidence for this asset, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Prediction {
    pub fn new(video: &Video, asset: impl Into<String>, tone: ToneAnalysis) -> Self {
        Self {
            video_id: video.id.clone(),
            title: video.title.clone(),
            thumbnail: video.thumbnail.clone(),
            published_at: video.published_at,
            asset: asset.into(),
            tone: Some(tone),
            method: None,
            confidence: None,
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: ClassificationMethod) -> Self {
        self.method = Some(method);
        self
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    #[must_use]
    pub fn key(&self) -> PredictionKey {
        PredictionKey::new(self.video_id.clone(), self.asset.clone())
    }

    /// Direction implied by the attached tone, if any.
    #[must_use]
    pub fn predicted_direction(&self) -> Option<Direction> {
        self.tone.as_ref().and_then(ToneAnalysis::direction)
    }

    /// Instant at which the resolution window closes.
    #[must_use]
    pub fn window_end(&self, window: Duration) -> DateTime<Utc> {
        self.published_at + window
    }

    /// True once the resolution window has fully elapsed at `now`.
    #[must_use]
    pub fn is_due(&self, window: Duration, now: DateTime<Utc>) -> bool {
        now >= self.window_end(window)
    }
}

/// Why a prediction is not (yet) resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// Window not elapsed, or the market-data lookup failed.
    NoMarketData,
    /// The record carries no tone information.
    NoTone,
    /// The tone is a tie and carries no forecast.
    NeutralTone,
    /// The classifier emitted an asset missing from the registry.
    UnknownAsset,
    /// The market did not move over the window.
    FlatMarket,
}

impl UnresolvedReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoMarketData => "no_market_data",
            Self::NoTone => "no_tone",
            Self::NeutralTone => "neutral_tone",
            Self::UnknownAsset => "unknown_asset",
            Self::FlatMarket => "flat_market",
        }
    }

    /// Reasons the recovery pass re-attempts.
    #[must_use]
    pub const fn is_recoverable(self) -> bool {
        matches!(self, Self::NoMarketData)
    }
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicted against actual direction.
///
/// `is_honey` is derived in [`Verdict::new`] and cannot be set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    predicted_direction: Direction,
    actual_direction: Direction,
    is_honey: bool,
}

impl Verdict {
    #[must_use]
    pub fn new(predicted: Direction, actual: Direction) -> Self {
        Self {
            predicted_direction: predicted,
            actual_direction: actual,
            is_honey: predicted != actual,
        }
    }

    #[must_use]
    pub const fn predicted(&self) -> Direction {
        self.predicted_direction
    }

    #[must_use]
    pub const fn actual(&self) -> Direction {
        self.actual_direction
    }

    /// True when the market moved against the call.
    #[must_use]
    pub const fn is_honey(&self) -> bool {
        self.is_honey
    }
}

/// A prediction judged against the market. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPrediction {
    pub prediction: Prediction,
    pub market: PriceWindow,
    pub verdict: Verdict,
    pub explanation: String,
    pub resolved_at: DateTime<Utc>,
}

impl ResolvedPrediction {
    #[must_use]
    pub fn key(&self) -> PredictionKey {
        self.prediction.key()
    }

    #[must_use]
    pub const fn is_honey(&self) -> bool {
        self.verdict.is_honey()
    }
}

/// A prediction waiting on data, with the reason it could not be resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedPrediction {
    pub prediction: Prediction,
    pub reason: UnresolvedReason,
    pub last_attempt_at: DateTime<Utc>,
}

impl UnresolvedPrediction {
    pub fn new(prediction: Prediction, reason: UnresolvedReason, at: DateTime<Utc>) -> Self {
        Self {
            prediction,
            reason,
            last_attempt_at: at,
        }
    }

    #[must_use]
    pub fn key(&self) -> PredictionKey {
        self.prediction.key()
    }
}

/// Outcome of one resolution attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(ResolvedPrediction),
    Unresolved(UnresolvedPrediction),
}

impl Resolution {
    #[must_use]
    pub fn key(&self) -> PredictionKey {
        match self {
            Self::Resolved(r) => r.key(),
            Self::Unresolved(u) => u.key(),
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// The unresolved reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<UnresolvedReason> {
        match self {
            Self::Resolved(_) => None,
            Self::Unresolved(u) => Some(u.reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tone::Tone;
    use chrono::TimeZone;

    fn video() -> Video {
        Video::new(
            "abc123",
            "비트코인 지금 사야 하는 이유",
            "",
            Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn verdict_is_honey_iff_directions_differ() {
        for predicted in [Direction::Bullish, Direction::Bearish] {
            for actual in [Direction::Bullish, Direction::Bearish] {
                let verdict = Verdict::new(predicted, actual);
                assert_eq!(verdict.is_honey(), predicted != actual);
            }
        }
    }

    #[test]
    fn prediction_key_and_direction() {
        let prediction = Prediction::new(
            &video(),
            "Bitcoin",
            ToneAnalysis::model(Tone::Positive, vec!["사야".into()], ""),
        );
        assert_eq!(prediction.key().to_string(), "abc123/Bitcoin");
        assert_eq!(prediction.predicted_direction(), Some(Direction::Bullish));
    }

    #[test]
    fn window_gates_on_elapsed_time() {
        let prediction = Prediction::new(&video(), "Bitcoin", ToneAnalysis::from_scores(1, 0));
        let window = Duration::hours(24);
        let published = prediction.published_at;
        assert!(!prediction.is_due(window, published + Duration::hours(23)));
        assert!(prediction.is_due(window, published + Duration::hours(24)));
    }

    #[test]
    fn reason_serializes_snake_case() {
        let json = serde_json::to_string(&UnresolvedReason::NoMarketData).unwrap();
        assert_eq!(json, r#""no_market_data""#);
        assert_eq!(UnresolvedReason::FlatMarket.to_string(), "flat_market");
        assert!(UnresolvedReason::NoMarketData.is_recoverable());
        assert!(!UnresolvedReason::NeutralTone.is_recoverable());
    }
}
