//! Classification to prediction fan-out.
//!
//! One title can name several assets; each becomes its own [`Prediction`].
//! Neutral titles produce nothing.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    AssetRegistry, ClassificationResult, Prediction, Tone, UnresolvedPrediction, UnresolvedReason,
    Video,
};

/// What to do with a detected asset that is not in the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownAssetPolicy {
    /// Keep it as unresolved with reason `unknown_asset`.
    #[default]
    Record,
    /// Discard it.
    Drop,
}

/// Predictions derived from one classification.
#[derive(Debug, Clone, Default)]
pub struct FanOut {
    /// Predictions on registry assets, ready for resolution.
    pub predictions: Vec<Prediction>,
    /// Predictions on assets the registry does not know.
    pub unknown: Vec<UnresolvedPrediction>,
}

/// Turn a classification into predictions.
///
/// A neutral tone yields nothing. Repeated asset labels within one title
/// collapse to the first occurrence.
pub fn fan_out(
    video: &Video,
    result: &ClassificationResult,
    registry: &AssetRegistry,
    policy: UnknownAssetPolicy,
    now: DateTime<Utc>,
) -> FanOut {
    let mut out = FanOut::default();
    if result.tone() == Tone::Neutral {
        debug!(video_id = %video.id, "Neutral title, no forecast");
        return out;
    }

    let mut seen = HashSet::new();
    for detected in &result.detected_assets {
        let known = detected
            .is_known()
            .then(|| registry.get(&detected.asset))
            .flatten();
        let label = known.map_or(detected.asset.as_str(), |a| a.label.as_str());
        if !seen.insert(label.to_string()) {
            continue;
        }

        let prediction = Prediction::new(video, label, result.tone_analysis.clone())
            .with_method(result.method)
            .with_confidence(detected.confidence);

        match (known, policy) {
            (Some(_), _) => out.predictions.push(prediction),
            (None, UnknownAssetPolicy::Record) => out.unknown.push(UnresolvedPrediction::new(
                prediction,
                UnresolvedReason::UnknownAsset,
                now,
            )),
            (None, UnknownAssetPolicy::Drop) => {
                debug!(video_id = %video.id, asset = %detected.asset, "Dropping unknown asset");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClassificationMethod, DetectedAsset, UNKNOWN_TICKER};
    use crate::testkit::domain::{classification, published, video};

    fn registry() -> AssetRegistry {
        AssetRegistry::builtin()
    }

    #[test]
    fn each_asset_spawns_a_prediction() {
        let v = video("v1", "코스피 나스닥 동반 급락");
        let result = classification(&["KOSPI", "NASDAQ"], Tone::Negative);

        let out = fan_out(&v, &result, &registry(), UnknownAssetPolicy::Record, published());

        let assets: Vec<_> = out.predictions.iter().map(|p| p.asset.as_str()).collect();
        assert_eq!(assets, ["KOSPI", "NASDAQ"]);
        assert!(out.unknown.is_empty());
        assert_eq!(out.predictions[0].method, Some(ClassificationMethod::Pattern));
    }

    #[test]
    fn neutral_tone_creates_nothing() {
        let v = video("v1", "비트코인 이야기");
        let result = classification(&["Bitcoin"], Tone::Neutral);

        let out = fan_out(&v, &result, &registry(), UnknownAssetPolicy::Record, published());
        assert!(out.predictions.is_empty());
        assert!(out.unknown.is_empty());
    }

    #[test]
    fn no_assets_creates_nothing() {
        let v = video("v1", "오늘의 경제");
        let result = classification(&[], Tone::Positive);
        let out = fan_out(&v, &result, &registry(), UnknownAssetPolicy::Record, published());
        assert!(out.predictions.is_empty());
    }

    #[test]
    fn unknown_asset_follows_policy() {
        let v = video("v1", "도지코인 폭등");
        let mut result = classification(&[], Tone::Positive);
        result.detected_assets.push(DetectedAsset {
            asset: "Dogecoin".into(),
            ticker: UNKNOWN_TICKER.into(),
            matched_text: "도지코인".into(),
            confidence: 0.9,
            reasoning: String::new(),
        });

        let recorded = fan_out(&v, &result, &registry(), UnknownAssetPolicy::Record, published());
        assert_eq!(recorded.unknown.len(), 1);
        assert_eq!(recorded.unknown[0].reason, UnresolvedReason::UnknownAsset);
        assert_eq!(recorded.unknown[0].prediction.confidence, Some(0.9));

        let dropped = fan_out(&v, &result, &registry(), UnknownAssetPolicy::Drop, published());
        assert!(dropped.unknown.is_empty());
        assert!(dropped.predictions.is_empty());
    }

    #[test]
    fn duplicate_labels_collapse() {
        let v = video("v1", "비트코인 BTC 급등");
        let result = classification(&["Bitcoin", "bitcoin"], Tone::Positive);
        let out = fan_out(&v, &result, &registry(), UnknownAssetPolicy::Record, published());
        assert_eq!(out.predictions.len(), 1);
        assert_eq!(out.predictions[0].asset, "Bitcoin");
    }
}
