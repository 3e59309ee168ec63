//! Classifier output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tone::{Tone, ToneAnalysis};

/// Ticker recorded for model-emitted assets missing from the registry.
pub const UNKNOWN_TICKER: &str = "UNKNOWN";

/// An asset detected in a title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedAsset {
    /// Registry label (or the model's identifier when unmapped).
    pub asset: String,
    /// Resolved ticker, or [`UNKNOWN_TICKER`].
    pub ticker: String,
    /// Span of the title that triggered the detection.
    pub matched_text: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    pub reasoning: String,
}

impl DetectedAsset {
    /// True when the asset resolved against the registry.
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.ticker != UNKNOWN_TICKER
    }
}

/// Which strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationMethod {
    Pattern,
    Llm,
}

/// Output of a classifier for one title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub method: ClassificationMethod,
    /// Model identifier for model-backed results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub classified_at: DateTime<Utc>,
    pub detected_assets: Vec<DetectedAsset>,
    pub tone_analysis: ToneAnalysis,
    /// Set when the strategy failed and this is the empty/neutral fallback.
    #[serde(default)]
    pub degraded: bool,
}

impl ClassificationResult {
    /// Empty assets and neutral tone, carrying a diagnostic.
    pub fn fallback(
        method: ClassificationMethod,
        model: Option<String>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            method,
            model,
            classified_at: Utc::now(),
            detected_assets: Vec::new(),
            tone_analysis: ToneAnalysis::unavailable(reasoning),
            degraded: true,
        }
    }

    #[must_use]
    pub fn tone(&self) -> Tone {
        self.tone_analysis.tone
    }

    /// True when the result carries a forecast on at least one asset.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        self.tone() != Tone::Neutral && !self.detected_assets.is_empty()
    }
}
