//! Ingestion adapter for version-1 ledger records.
//!
//! Version-1 files are bare JSON arrays written before the envelope format.
//! Their records carry tone in one of several shapes:
//!
//! - a model verdict: `gpt4oAnalysis.tone` or `analysis.toneAnalysis.tone`
//! - a keyword score pair: `positiveScore`/`negativeScore`
//!   (or `bullishScore`/`bearishScore`)
//!
//! Everything is converted to [`ToneAnalysis`] here, so nothing downstream
//! ever sees the legacy shapes. Score pairs go through
//! [`ToneAnalysis::from_scores`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{
    ClassificationMethod, Direction, Granularity, MarketMove, Prediction, PriceWindow, Resolution,
    ResolvedPrediction, Tone, ToneAnalysis, UnresolvedPrediction, UnresolvedReason, Verdict,
    VideoId,
};
use crate::error::{Error, Result};

/// Migrate one version-1 unresolved record.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the record lacks its identity fields or names
/// an unknown reason.
pub fn unresolved_from_v1(value: Value) -> Result<UnresolvedPrediction> {
    let record: LegacyUnresolved = serde_json::from_value(value)
        .map_err(|e| Error::Parse(format!("legacy unresolved record: {e}")))?;

    let reason = parse_reason(&record.reason)?;
    let tone = legacy_tone(&record.tone);
    let method = record.tone.model_verdict().map(|_| ClassificationMethod::Llm);
    let last_attempt_at = record.published_at;

    Ok(UnresolvedPrediction::new(
        Prediction {
            video_id: VideoId::new(record.video_id),
            title: record.title,
            thumbnail: record.thumbnail,
            published_at: record.published_at,
            asset: record.asset,
            tone,
            method,
            confidence: record.tone.model_verdict().and_then(|v| v.confidence),
        },
        reason,
        last_attempt_at,
    ))
}

/// Migrate one version-1 resolved record.
///
/// The stored `isHoney` and actual direction are ignored. The outcome is
/// re-derived from the stored prices and tone, so a record that does not
/// pass the current resolution rules comes back unresolved: a flat window
/// gives `flat_market`, a tied tone `neutral_tone`, no tone `no_tone`.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the record lacks identity or prices.
pub fn resolved_from_v1(value: Value) -> Result<Resolution> {
    let record: LegacyResolved = serde_json::from_value(value)
        .map_err(|e| Error::Parse(format!("legacy resolved record: {e}")))?;
    let key = format!("{}/{}", record.video_id, record.asset_label().unwrap_or("?"));

    let asset = record
        .asset_label()
        .ok_or_else(|| Error::Parse(format!("legacy resolved record {key}: no asset")))?
        .to_string();

    let window = record
        .price_window()
        .ok_or_else(|| Error::Parse(format!("legacy resolved record {key}: no prices")))?;

    let tone = record.tone();
    let predicted = match &tone {
        Some(tone) => tone.direction(),
        None => record.judgment.as_ref().and_then(|j| j.predicted_direction),
    };
    let resolved_at = record
        .analysis
        .as_ref()
        .and_then(|a| a.timestamp)
        .unwrap_or(record.published_at);
    let stored_actual = record
        .judgment
        .as_ref()
        .and_then(|j| j.actual_direction.as_deref().and_then(parse_actual))
        .or_else(|| record.actual_direction.as_deref().and_then(parse_actual));
    let stored_reasoning = record
        .judgment
        .as_ref()
        .map(|j| j.reasoning.clone())
        .filter(|r| !r.is_empty());

    let prediction = Prediction {
        video_id: VideoId::new(record.video_id),
        title: record.title,
        thumbnail: record.thumbnail,
        published_at: record.published_at,
        asset,
        tone: tone.clone(),
        method: Some(if record.analysis.is_some() {
            ClassificationMethod::Llm
        } else {
            ClassificationMethod::Pattern
        }),
        confidence: None,
    };

    let unresolved = |prediction, reason| {
        Ok(Resolution::Unresolved(UnresolvedPrediction::new(
            prediction,
            reason,
            resolved_at,
        )))
    };
    let Some(predicted) = predicted else {
        let reason = if tone.is_some() {
            UnresolvedReason::NeutralTone
        } else {
            UnresolvedReason::NoTone
        };
        return unresolved(prediction, reason);
    };
    let Some(actual) = window.movement.direction() else {
        return unresolved(prediction, UnresolvedReason::FlatMarket);
    };

    // Stored reasoning is kept only when it describes the same outcome.
    let explanation = stored_reasoning
        .filter(|_| stored_actual == Some(actual))
        .unwrap_or_else(|| format!("{predicted} call, market {actual}"));

    Ok(Resolution::Resolved(ResolvedPrediction {
        prediction,
        market: window,
        verdict: Verdict::new(predicted, actual),
        explanation,
        resolved_at,
    }))
}

fn parse_reason(raw: &str) -> Result<UnresolvedReason> {
    match raw {
        "no_market_data" => Ok(UnresolvedReason::NoMarketData),
        "no_tone" => Ok(UnresolvedReason::NoTone),
        "neutral_tone" | "neutral" => Ok(UnresolvedReason::NeutralTone),
        "unknown_asset" | "unmapped_asset" => Ok(UnresolvedReason::UnknownAsset),
        "flat_market" => Ok(UnresolvedReason::FlatMarket),
        other => Err(Error::Parse(format!("unknown unresolved reason: {other}"))),
    }
}

fn parse_tone_label(raw: &str) -> Option<Tone> {
    match raw {
        "positive" | "bullish" => Some(Tone::Positive),
        "negative" | "bearish" => Some(Tone::Negative),
        "neutral" => Some(Tone::Neutral),
        _ => None,
    }
}

/// Actual direction in either vocabulary.
fn parse_actual(raw: &str) -> Option<Direction> {
    match raw {
        "up" | "bullish" => Some(Direction::Bullish),
        "down" | "bearish" => Some(Direction::Bearish),
        _ => None,
    }
}

fn parse_move(raw: &str) -> Option<MarketMove> {
    match raw {
        "up" => Some(MarketMove::Up),
        "down" => Some(MarketMove::Down),
        "flat" => Some(MarketMove::Flat),
        _ => None,
    }
}

/// Canonical tone from whichever legacy encoding is present. A model label
/// wins over a score pair.
fn legacy_tone(fields: &LegacyToneFields) -> Option<ToneAnalysis> {
    if let Some(verdict) = fields.model_verdict() {
        if let Some(tone) = verdict.tone.as_deref().and_then(parse_tone_label) {
            return Some(ToneAnalysis::model(
                tone,
                verdict.keywords.clone(),
                verdict.reasoning.clone(),
            ));
        }
    }
    fields
        .score_pair()
        .map(|(positive, negative)| ToneAnalysis::from_scores(positive, negative))
}

#[derive(Deserialize, Default)]
struct ModelVerdict {
    #[serde(default)]
    tone: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LegacyToneFields {
    #[serde(default, rename = "gpt4oAnalysis")]
    gpt4o_analysis: Option<ModelVerdict>,
    #[serde(default)]
    tone_analysis: Option<ModelVerdict>,
    #[serde(default)]
    positive_score: Option<u32>,
    #[serde(default)]
    negative_score: Option<u32>,
    #[serde(default)]
    bullish_score: Option<u32>,
    #[serde(default)]
    bearish_score: Option<u32>,
}

impl LegacyToneFields {
    fn model_verdict(&self) -> Option<&ModelVerdict> {
        self.gpt4o_analysis
            .as_ref()
            .or(self.tone_analysis.as_ref())
            .filter(|v| v.tone.is_some())
    }

    fn score_pair(&self) -> Option<(u32, u32)> {
        match (self.positive_score, self.negative_score) {
            (Some(p), Some(n)) => Some((p, n)),
            _ => match (self.bullish_score, self.bearish_score) {
                (Some(p), Some(n)) => Some((p, n)),
                _ => None,
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyUnresolved {
    video_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    thumbnail: String,
    published_at: DateTime<Utc>,
    asset: String,
    reason: String,
    #[serde(flatten)]
    tone: LegacyToneFields,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyAnalysis {
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    detected_assets: Vec<LegacyAsset>,
    #[serde(default)]
    tone_analysis: Option<ModelVerdict>,
}

#[derive(Deserialize)]
struct LegacyAsset {
    asset: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyMarketData {
    #[serde(default)]
    asset: Option<String>,
    #[serde(default)]
    ticker: Option<String>,
    close_price: Decimal,
    previous_close: Decimal,
    #[serde(default)]
    direction: Option<String>,
    #[serde(default)]
    trading_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyJudgment {
    #[serde(default)]
    predicted_direction: Option<Direction>,
    #[serde(default)]
    actual_direction: Option<String>,
    #[serde(default)]
    reasoning: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyResolved {
    video_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    thumbnail: String,
    published_at: DateTime<Utc>,
    #[serde(default)]
    asset: Option<String>,
    #[serde(default)]
    analysis: Option<LegacyAnalysis>,
    #[serde(default)]
    market_data: Option<LegacyMarketData>,
    #[serde(default)]
    judgment: Option<LegacyJudgment>,
    // Flat collect-style records.
    #[serde(default)]
    price_at_publish: Option<Decimal>,
    #[serde(default, rename = "priceAfter24h")]
    price_after_24h: Option<Decimal>,
    #[serde(default)]
    actual_direction: Option<String>,
    #[serde(default)]
    sentiment: Option<String>,
    #[serde(flatten)]
    scores: LegacyToneFields,
}

impl LegacyResolved {
    fn asset_label(&self) -> Option<&str> {
        self.asset
            .as_deref()
            .or_else(|| self.market_data.as_ref().and_then(|m| m.asset.as_deref()))
            .or_else(|| {
                self.analysis
                    .as_ref()
                    .and_then(|a| a.detected_assets.first())
                    .map(|a| a.asset.as_str())
            })
    }

    fn price_window(&self) -> Option<PriceWindow> {
        if let Some(market) = &self.market_data {
            let ticker = market
                .ticker
                .clone()
                .or_else(|| self.asset_label().map(str::to_string))
                .unwrap_or_default();
            let window = PriceWindow::from_prices(
                ticker,
                market.previous_close,
                market.close_price,
                Granularity::Daily,
                market.direction.as_deref().and_then(parse_move),
            )?;
            return Some(match market.trading_date {
                Some(date) => window.on_trading_date(date),
                None => window,
            });
        }
        let (at, after) = (self.price_at_publish?, self.price_after_24h?);
        let ticker = self.asset_label().unwrap_or_default().to_string();
        PriceWindow::from_prices(ticker, at, after, Granularity::Hourly, None)
    }

    fn tone(&self) -> Option<ToneAnalysis> {
        let analysed = self
            .analysis
            .as_ref()
            .and_then(|a| a.tone_analysis.as_ref())
            .and_then(|v| {
                let tone = v.tone.as_deref().and_then(parse_tone_label)?;
                Some(ToneAnalysis::model(tone, v.keywords.clone(), v.reasoning.clone()))
            });
        analysed
            .or_else(|| legacy_tone(&self.scores))
            .or_else(|| {
                let tone = self.sentiment.as_deref().and_then(parse_tone_label)?;
                Some(ToneAnalysis::model(tone, Vec::new(), "legacy sentiment label"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ToneSource;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn score_pair_record_migrates_through_adapter() {
        let record = unresolved_from_v1(json!({
            "videoId": "v1",
            "title": "비트코인 반등",
            "publishedAt": "2025-01-10T09:00:00Z",
            "asset": "Bitcoin",
            "reason": "no_market_data",
            "positiveScore": 2,
            "negativeScore": 1
        }))
        .unwrap();

        let tone = record.prediction.tone.unwrap();
        assert_eq!(tone.tone, Tone::Positive);
        assert_eq!(
            tone.source,
            ToneSource::LegacyScores {
                positive: 2,
                negative: 1
            }
        );
        assert_eq!(record.reason, UnresolvedReason::NoMarketData);
    }

    #[test]
    fn tied_score_pair_is_neutral() {
        let record = unresolved_from_v1(json!({
            "videoId": "v1",
            "publishedAt": "2025-01-10T09:00:00Z",
            "asset": "KOSPI",
            "reason": "no_market_data",
            "positiveScore": 1,
            "negativeScore": 1
        }))
        .unwrap();
        assert_eq!(record.prediction.tone.unwrap().tone, Tone::Neutral);
    }

    #[test]
    fn model_label_wins_over_scores() {
        let record = unresolved_from_v1(json!({
            "videoId": "v1",
            "publishedAt": "2025-01-10T09:00:00Z",
            "asset": "Samsung",
            "reason": "no_market_data",
            "gpt4oAnalysis": {"tone": "negative", "reasoning": "하락 전망", "confidence": 0.8},
            "positiveScore": 3,
            "negativeScore": 0
        }))
        .unwrap();
        let tone = record.prediction.tone.unwrap();
        assert_eq!(tone.tone, Tone::Negative);
        assert_eq!(tone.source, ToneSource::Model);
        assert_eq!(record.prediction.confidence, Some(0.8));
    }

    #[test]
    fn record_without_tone_has_none() {
        let record = unresolved_from_v1(json!({
            "videoId": "v1",
            "publishedAt": "2025-01-10T09:00:00Z",
            "asset": "Samsung",
            "reason": "no_market_data"
        }))
        .unwrap();
        assert!(record.prediction.tone.is_none());
    }

    #[test]
    fn unknown_reason_is_rejected() {
        let result = unresolved_from_v1(json!({
            "videoId": "v1",
            "publishedAt": "2025-01-10T09:00:00Z",
            "asset": "Samsung",
            "reason": "cosmic_rays"
        }));
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    fn expect_resolved(resolution: Resolution) -> ResolvedPrediction {
        match resolution {
            Resolution::Resolved(r) => r,
            Resolution::Unresolved(u) => panic!("expected resolved, got {}", u.reason),
        }
    }

    fn samsung_record(close: u32, direction: &str, judgment: Value) -> Value {
        json!({
            "videoId": "v2",
            "title": "삼성전자 지금 팔아라",
            "publishedAt": "2025-01-10T09:00:00Z",
            "analysis": {
                "method": "v2-score-recovered",
                "timestamp": "2025-01-12T00:00:00Z",
                "detectedAssets": [{"asset": "Samsung", "ticker": "005930.KS"}],
                "toneAnalysis": {"tone": "negative", "reasoning": "매도 권유"}
            },
            "marketData": {
                "asset": "Samsung",
                "ticker": "005930.KS",
                "closePrice": close,
                "previousClose": 50000,
                "direction": direction,
                "tradingDate": "2025-01-10"
            },
            "judgment": judgment
        })
    }

    #[test]
    fn analyzed_record_migrates() {
        let record = expect_resolved(
            resolved_from_v1(samsung_record(
                55000,
                "up",
                json!({
                    "predictedDirection": "bearish",
                    "actualDirection": "bullish",
                    "isHoney": false,
                    "reasoning": "부정 전망 → 실제 상승"
                }),
            ))
            .unwrap(),
        );

        assert_eq!(record.prediction.asset, "Samsung");
        assert_eq!(record.market.change_percent, dec!(10));
        assert!(record.is_honey());
        assert_eq!(record.verdict.predicted(), Direction::Bearish);
        assert_eq!(record.verdict.actual(), Direction::Bullish);
        assert_eq!(record.explanation, "부정 전망 → 실제 상승");
    }

    #[test]
    fn stored_outcome_contradicting_prices_is_overridden() {
        // Prices fell, stored judgment claims the market rose.
        let record = expect_resolved(
            resolved_from_v1(samsung_record(
                45000,
                "down",
                json!({
                    "predictedDirection": "bearish",
                    "actualDirection": "bullish",
                    "isHoney": true,
                    "reasoning": "부정 전망 → 실제 상승"
                }),
            ))
            .unwrap(),
        );

        assert_eq!(record.verdict.actual(), Direction::Bearish);
        assert!(!record.is_honey());
        assert_ne!(record.explanation, "부정 전망 → 실제 상승");
    }

    #[test]
    fn stored_prediction_does_not_override_tone() {
        let record = expect_resolved(
            resolved_from_v1(samsung_record(
                55000,
                "up",
                json!({"predictedDirection": "bullish", "actualDirection": "bullish"}),
            ))
            .unwrap(),
        );

        assert_eq!(record.verdict.predicted(), Direction::Bearish);
        assert!(record.is_honey());
    }

    #[test]
    fn flat_window_becomes_flat_market() {
        let resolution = resolved_from_v1(samsung_record(
            50000,
            "flat",
            json!({
                "predictedDirection": "bullish",
                "actualDirection": "bearish",
                "isHoney": true
            }),
        ))
        .unwrap();

        let Resolution::Unresolved(record) = resolution else {
            panic!("flat window must not resolve");
        };
        assert_eq!(record.reason, UnresolvedReason::FlatMarket);
        assert_eq!(record.prediction.asset, "Samsung");
    }

    #[test]
    fn judgment_without_tone_fields_still_resolves() {
        let record = expect_resolved(
            resolved_from_v1(json!({
                "videoId": "v5",
                "publishedAt": "2025-01-10T09:00:00Z",
                "marketData": {
                    "asset": "KOSPI",
                    "ticker": "^KS11",
                    "closePrice": 2450,
                    "previousClose": 2500,
                    "direction": "down"
                },
                "judgment": {"predictedDirection": "bullish", "actualDirection": "bearish"}
            }))
            .unwrap(),
        );

        assert_eq!(record.verdict.predicted(), Direction::Bullish);
        assert!(record.is_honey());
    }

    #[test]
    fn tied_scores_on_resolved_record_become_neutral_tone() {
        let resolution = resolved_from_v1(json!({
            "videoId": "v6",
            "publishedAt": "2025-01-10T09:00:00Z",
            "asset": "Bitcoin",
            "bullishScore": 1,
            "bearishScore": 1,
            "priceAtPublish": 100,
            "priceAfter24h": 90,
            "isHoney": false
        }))
        .unwrap();

        assert_eq!(resolution.reason(), Some(UnresolvedReason::NeutralTone));
    }

    #[test]
    fn flat_collect_record_migrates() {
        let record = expect_resolved(
            resolved_from_v1(json!({
                "id": "x",
                "videoId": "v3",
                "title": "비트코인 사야",
                "publishedAt": "2025-01-10T09:00:00Z",
                "asset": "Bitcoin",
                "sentiment": "bullish",
                "bullishScore": 1,
                "bearishScore": 0,
                "priceAtPublish": 100,
                "priceAfter24h": 90,
                "actualDirection": "down",
                "isHoney": true
            }))
            .unwrap(),
        );

        assert_eq!(record.market.change_percent, dec!(-10));
        assert_eq!(record.verdict.predicted(), Direction::Bullish);
        assert!(record.is_honey());
    }

    #[test]
    fn resolved_record_without_prices_is_rejected() {
        let result = resolved_from_v1(json!({
            "videoId": "v4",
            "publishedAt": "2025-01-10T09:00:00Z",
            "asset": "Bitcoin",
            "sentiment": "bullish"
        }));
        assert!(result.is_err());
    }
}
