//! Pure domain types: videos, assets, tone, predictions and verdicts.
//!
//! Nothing in here performs I/O.

pub mod asset;
pub mod classification;
pub mod error;
pub mod id;
pub mod market;
pub mod prediction;
pub mod stats;
pub mod tone;
pub mod video;

pub use asset::{AssetClass, AssetDefinition, AssetRegistry};
pub use classification::{ClassificationMethod, ClassificationResult, DetectedAsset, UNKNOWN_TICKER};
pub use error::DomainError;
pub use id::{CacheKey, PredictionKey, VideoId};
pub use market::{Granularity, PriceWindow};
pub use prediction::{
    Prediction, Resolution, ResolvedPrediction, UnresolvedPrediction, UnresolvedReason, Verdict,
};
pub use stats::{AssetStats, HoneyStats, RecentPrediction, RecentStatus, StatsReport, Tally};
pub use tone::{Direction, MarketMove, Tone, ToneAnalysis, ToneSource};
pub use video::Video;
