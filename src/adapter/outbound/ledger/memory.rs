//! In-process prediction ledger.
//!
//! Same commit rules as the file ledger, without persistence. Used by tests
//! and by `classify`-style dry runs.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::LedgerState;
use crate::domain::{ResolvedPrediction, StatsReport, UnresolvedPrediction};
use crate::error::Result;
use crate::port::outbound::ledger::{CommitSummary, LedgerBatch, PredictionLedger};

#[derive(Default)]
pub struct MemoryLedger {
    state: Mutex<LedgerState>,
    stats: Mutex<Option<StatsReport>>,
    commits: Mutex<usize>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the ledger with existing records.
    #[must_use]
    pub fn with_records(
        resolved: Vec<ResolvedPrediction>,
        unresolved: Vec<UnresolvedPrediction>,
    ) -> Self {
        let ledger = Self::default();
        *ledger.state.lock() = LedgerState {
            resolved,
            unresolved,
        };
        ledger
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> LedgerState {
        self.state.lock().clone()
    }

    /// Number of commits applied so far.
    #[must_use]
    pub fn commit_count(&self) -> usize {
        *self.commits.lock()
    }
}

#[async_trait]
impl PredictionLedger for MemoryLedger {
    async fn load_resolved(&self) -> Result<Vec<ResolvedPrediction>> {
        Ok(self.state.lock().resolved.clone())
    }

    async fn load_unresolved(&self) -> Result<Vec<UnresolvedPrediction>> {
        Ok(self.state.lock().unresolved.clone())
    }

    async fn commit(&self, batch: LedgerBatch) -> Result<CommitSummary> {
        *self.commits.lock() += 1;
        Ok(self.state.lock().apply(batch))
    }

    async fn save_stats(&self, report: &StatsReport) -> Result<()> {
        *self.stats.lock() = Some(report.clone());
        Ok(())
    }

    async fn load_stats(&self) -> Result<Option<StatsReport>> {
        Ok(self.stats.lock().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UnresolvedReason;
    use crate::testkit::domain::{resolved, unresolved};

    #[tokio::test]
    async fn applies_commit_rules() {
        let ledger = MemoryLedger::with_records(
            vec![],
            vec![unresolved("v1", "KOSPI", UnresolvedReason::NoMarketData)],
        );

        let summary = ledger
            .commit(LedgerBatch {
                resolved: vec![resolved("v1", "KOSPI", false)],
                unresolved: vec![unresolved("v2", "KOSPI", UnresolvedReason::FlatMarket)],
            })
            .await
            .unwrap();

        assert_eq!(summary.resolved_added, 1);
        assert_eq!(summary.unresolved_cleared, 1);
        assert_eq!(summary.unresolved_upserted, 1);
        assert_eq!(ledger.commit_count(), 1);

        let unresolved = ledger.load_unresolved().await.unwrap();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].prediction.video_id.as_str(), "v2");
    }
}
