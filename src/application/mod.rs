//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the collection run, the recovery pass and the stats
//! artifact.

pub mod aggregate;
pub mod pipeline;
pub mod predictions;
pub mod recovery;
pub mod report;
pub mod resolver;

pub use aggregate::aggregate;
pub use pipeline::{CollectOptions, CollectSummary, CollectionPipeline};
pub use predictions::{fan_out, FanOut, UnknownAssetPolicy};
pub use recovery::{RecoveryPass, RecoverySummary};
pub use report::{build_report, refresh_stats, DEFAULT_RECENT_LIMIT};
pub use resolver::PredictionResolver;
