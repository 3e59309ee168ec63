//! Deterministic keyword-pattern classifier.
//!
//! An asset is detected when any of its registry patterns matches the title.
//! Tone compares how many bullish and bearish lexicon patterns match; a tie
//! (including no match at all) is neutral. No network access, no state.

use async_trait::async_trait;
use chrono::Utc;
use regex::{Regex, RegexBuilder};

use crate::domain::{
    AssetRegistry, ClassificationMethod, ClassificationResult, DetectedAsset, DomainError, Tone,
    ToneAnalysis, ToneSource, Video,
};
use crate::port::outbound::classifier::TitleClassifier;

/// Words that call for a rise.
pub const BULLISH_LEXICON: &[&str] = &[
    "상승", "오른다", "올라", "급등", "폭등", "사야", "매수", "기회", "저점", "반등", "회복",
    "돌파", "신고가", "호재",
];

/// Words that call for a fall.
pub const BEARISH_LEXICON: &[&str] = &[
    "하락", "떨어", "내려", "급락", "폭락", "팔아", "매도", "위험", "고점", "조정", "붕괴",
    "위기", "곤두박질", "악재", "버블", "끝", "빠진다", "조심", "무너", "반토막", "침체",
];

/// Pattern confidence: a literal hit in the title.
const PATTERN_CONFIDENCE: f64 = 1.0;

struct AssetPatterns {
    label: String,
    ticker: String,
    patterns: Vec<Regex>,
}

/// Registry-driven pattern classifier.
pub struct PatternClassifier {
    assets: Vec<AssetPatterns>,
    bullish: Vec<Regex>,
    bearish: Vec<Regex>,
}

impl PatternClassifier {
    /// Compile the patterns of every registry entry that has any.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPattern`] if a pattern does not compile.
    pub fn new(registry: &AssetRegistry) -> Result<Self, DomainError> {
        let assets = registry
            .iter()
            .filter(|asset| !asset.patterns.is_empty())
            .map(|asset| {
                Ok(AssetPatterns {
                    label: asset.label.clone(),
                    ticker: asset.ticker.clone(),
                    patterns: compile(&asset.label, &asset.patterns)?,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(Self {
            assets,
            bullish: compile("bullish lexicon", BULLISH_LEXICON)?,
            bearish: compile("bearish lexicon", BEARISH_LEXICON)?,
        })
    }

    /// Classify a bare title.
    #[must_use]
    pub fn analyze(&self, title: &str) -> ClassificationResult {
        let detected_assets = self
            .assets
            .iter()
            .filter_map(|asset| {
                asset.patterns.iter().find_map(|pattern| {
                    pattern.find(title).map(|hit| DetectedAsset {
                        asset: asset.label.clone(),
                        ticker: asset.ticker.clone(),
                        matched_text: hit.as_str().to_string(),
                        confidence: PATTERN_CONFIDENCE,
                        reasoning: format!("title matches /{}/", pattern.as_str()),
                    })
                })
            })
            .collect();

        let bullish_hits = hits(&self.bullish, title);
        let bearish_hits = hits(&self.bearish, title);
        let bullish_score = count(&bullish_hits);
        let bearish_score = count(&bearish_hits);
        let tone = Tone::from_counts(bullish_score, bearish_score);

        ClassificationResult {
            method: ClassificationMethod::Pattern,
            model: None,
            classified_at: Utc::now(),
            detected_assets,
            tone_analysis: ToneAnalysis {
                tone,
                keywords: bullish_hits.into_iter().chain(bearish_hits).collect(),
                reasoning: format!("bullish {bullish_score} vs bearish {bearish_score}"),
                source: ToneSource::Pattern {
                    bullish_score,
                    bearish_score,
                },
            },
            degraded: false,
        }
    }
}

#[async_trait]
impl TitleClassifier for PatternClassifier {
    fn name(&self) -> &'static str {
        "pattern"
    }

    async fn classify(&self, video: &Video) -> ClassificationResult {
        self.analyze(&video.title)
    }
}

fn compile<S: AsRef<str>>(label: &str, patterns: &[S]) -> Result<Vec<Regex>, DomainError> {
    patterns
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern.as_ref())
                .case_insensitive(true)
                .build()
                .map_err(|e| DomainError::InvalidPattern {
                    label: label.to_string(),
                    reason: e.to_string(),
                })
        })
        .collect()
}

/// Matched spans, one per lexicon pattern that hits.
fn hits(lexicon: &[Regex], title: &str) -> Vec<String> {
    lexicon
        .iter()
        .filter_map(|pattern| pattern.find(title))
        .map(|m| m.as_str().to_string())
        .collect()
}

fn count(hits: &[String]) -> u32 {
    u32::try_from(hits.len()).unwrap_or(u32::MAX)
}
