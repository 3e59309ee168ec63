//! Prediction ledger port.
//!
//! The ledger is the system of record for verdicts. It is keyed by
//! (video id, asset) and has append-only semantics for resolved records.

use async_trait::async_trait;

use crate::domain::{ResolvedPrediction, StatsReport, UnresolvedPrediction};
use crate::error::Result;

/// Records produced by one run, committed together.
#[derive(Debug, Clone, Default)]
pub struct LedgerBatch {
    pub resolved: Vec<ResolvedPrediction>,
    pub unresolved: Vec<UnresolvedPrediction>,
}

impl LedgerBatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty() && self.unresolved.is_empty()
    }
}

/// What a commit changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Resolved records newly appended.
    pub resolved_added: usize,
    /// Resolved records skipped because their key was already resolved.
    pub resolved_skipped: usize,
    /// Unresolved records inserted or replaced.
    pub unresolved_upserted: usize,
    /// Unresolved records dropped because their key is now resolved.
    pub unresolved_cleared: usize,
}

/// Persistent store of resolved and unresolved predictions.
///
/// Commit rules:
/// - a resolved record whose key is already resolved is skipped, never rewritten;
/// - an unresolved record replaces any unresolved record with the same key,
///   unless that key is resolved;
/// - resolving a key removes it from the unresolved set.
#[async_trait]
pub trait PredictionLedger: Send + Sync {
    /// All resolved records.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    async fn load_resolved(&self) -> Result<Vec<ResolvedPrediction>>;

    /// All unresolved records.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    async fn load_unresolved(&self) -> Result<Vec<UnresolvedPrediction>>;

    /// Apply a batch under the commit rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be written.
    async fn commit(&self, batch: LedgerBatch) -> Result<CommitSummary>;

    /// Persist the aggregate statistics artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be written.
    async fn save_stats(&self, report: &StatsReport) -> Result<()>;

    /// Latest statistics artifact, if one was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact exists but cannot be read.
    async fn load_stats(&self) -> Result<Option<StatsReport>>;
}
