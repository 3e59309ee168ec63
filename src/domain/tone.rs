//! Tone, predicted direction, and realized market move.
//!
//! Two scoring schemes exist in stored data: a single tone label (pattern or
//! model output) and a legacy pair of positive/negative keyword scores.
//! [`ToneAnalysis`] is the one canonical form; [`ToneAnalysis::from_scores`]
//! is the adapter for the legacy pair.

use serde::{Deserialize, Serialize};

/// Sentiment polarity of a title.
///
/// Accepts both `positive/negative` and `bullish/bearish` spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[serde(alias = "bullish")]
    Positive,
    #[serde(alias = "bearish")]
    Negative,
    Neutral,
}

impl Tone {
    /// The forecast this tone carries. Neutral carries none.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Positive => Some(Direction::Bullish),
            Self::Negative => Some(Direction::Bearish),
            Self::Neutral => None,
        }
    }

    /// Decide a tone from two keyword counts; ties (including 0:0) are neutral.
    #[must_use]
    pub fn from_counts(positive: u32, negative: u32) -> Self {
        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => Self::Positive,
            std::cmp::Ordering::Less => Self::Negative,
            std::cmp::Ordering::Equal => Self::Neutral,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market direction: predicted (from tone) or actual (from price change).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Realized move over a price window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketMove {
    Up,
    Down,
    Flat,
}

impl MarketMove {
    /// Direction of the move; flat has none.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::Bullish),
            Self::Down => Some(Direction::Bearish),
            Self::Flat => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Flat => "flat",
        }
    }
}

/// Which scheme produced a tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToneSource {
    /// Keyword-pattern counts from the pattern classifier.
    Pattern { bullish_score: u32, bearish_score: u32 },
    /// A language model's single label.
    Model,
    /// Legacy positive/negative score pair found in stored records.
    LegacyScores { positive: u32, negative: u32 },
}

/// Canonical tone verdict for one title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneAnalysis {
    pub tone: Tone,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
    pub source: ToneSource,
}

impl ToneAnalysis {
    /// A tone label produced by a model.
    pub fn model(tone: Tone, keywords: Vec<String>, reasoning: impl Into<String>) -> Self {
        Self {
            tone,
            keywords,
            reasoning: reasoning.into(),
            source: ToneSource::Model,
        }
    }

    /// Adapter for the legacy positive/negative score pair.
    ///
    /// Strict inequality decides the tone; an exact tie becomes neutral.
    #[must_use]
    pub fn from_scores(positive: u32, negative: u32) -> Self {
        let tone = Tone::from_counts(positive, negative);
        let reasoning = match tone {
            Tone::Positive => format!("legacy scores: positive {positive} > negative {negative}"),
            Tone::Negative => format!("legacy scores: negative {negative} > positive {positive}"),
            Tone::Neutral => format!("legacy scores tied ({positive}:{negative})"),
        };
        Self {
            tone,
            keywords: Vec::new(),
            reasoning,
            source: ToneSource::LegacyScores { positive, negative },
        }
    }

    /// Neutral verdict used when classification fails.
    pub fn unavailable(reasoning: impl Into<String>) -> Self {
        Self::model(Tone::Neutral, Vec::new(), reasoning)
    }

    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        self.tone.direction()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_maps_one_to_one_to_direction() {
        assert_eq!(Tone::Positive.direction(), Some(Direction::Bullish));
        assert_eq!(Tone::Negative.direction(), Some(Direction::Bearish));
        assert_eq!(Tone::Neutral.direction(), None);
    }

    #[test]
    fn counts_tie_and_zero_are_neutral() {
        assert_eq!(Tone::from_counts(0, 0), Tone::Neutral);
        assert_eq!(Tone::from_counts(2, 2), Tone::Neutral);
        assert_eq!(Tone::from_counts(1, 0), Tone::Positive);
        assert_eq!(Tone::from_counts(0, 2), Tone::Negative);
    }

    #[test]
    fn tone_accepts_both_spellings() {
        let bullish: Tone = serde_json::from_str(r#""bullish""#).unwrap();
        let positive: Tone = serde_json::from_str(r#""positive""#).unwrap();
        let bearish: Tone = serde_json::from_str(r#""bearish""#).unwrap();
        assert_eq!(bullish, Tone::Positive);
        assert_eq!(positive, Tone::Positive);
        assert_eq!(bearish, Tone::Negative);
    }

    #[test]
    fn legacy_scores_adapter() {
        assert_eq!(ToneAnalysis::from_scores(3, 1).tone, Tone::Positive);
        assert_eq!(ToneAnalysis::from_scores(1, 3).tone, Tone::Negative);

        let tie = ToneAnalysis::from_scores(2, 2);
        assert_eq!(tie.tone, Tone::Neutral);
        assert_eq!(
            tie.source,
            ToneSource::LegacyScores {
                positive: 2,
                negative: 2
            }
        );
    }

    #[test]
    fn flat_move_has_no_direction() {
        assert_eq!(MarketMove::Flat.direction(), None);
        assert_eq!(MarketMove::Up.direction(), Some(Direction::Bullish));
        assert_eq!(MarketMove::Down.direction(), Some(Direction::Bearish));
    }
}
