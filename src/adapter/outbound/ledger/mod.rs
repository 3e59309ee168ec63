//! Prediction ledger adapters.
//!
//! [`LedgerState`] holds the commit rules shared by every ledger backend;
//! [`JsonLedger`] persists the state as year/month partitioned JSON files and
//! [`MemoryLedger`] keeps it in process.

pub mod json;
pub mod legacy;
pub mod memory;

use std::collections::HashSet;

use crate::domain::{PredictionKey, ResolvedPrediction, UnresolvedPrediction};
use crate::port::outbound::ledger::{CommitSummary, LedgerBatch};

pub use json::JsonLedger;
pub use memory::MemoryLedger;

/// Resolved and unresolved records held in memory.
#[derive(Debug, Clone, Default)]
pub struct LedgerState {
    pub resolved: Vec<ResolvedPrediction>,
    pub unresolved: Vec<UnresolvedPrediction>,
}

impl LedgerState {
    #[must_use]
    pub fn resolved_keys(&self) -> HashSet<PredictionKey> {
        self.resolved.iter().map(ResolvedPrediction::key).collect()
    }

    /// Apply a batch under the ledger's commit rules.
    pub fn apply(&mut self, batch: LedgerBatch) -> CommitSummary {
        let mut summary = CommitSummary::default();
        let mut resolved_keys = self.resolved_keys();

        for record in batch.resolved {
            if resolved_keys.insert(record.key()) {
                self.resolved.push(record);
                summary.resolved_added += 1;
            } else {
                summary.resolved_skipped += 1;
            }
        }

        let before = self.unresolved.len();
        self.unresolved
            .retain(|u| !resolved_keys.contains(&u.key()));
        summary.unresolved_cleared = before - self.unresolved.len();

        for record in batch.unresolved {
            let key = record.key();
            if resolved_keys.contains(&key) {
                continue;
            }
            match self.unresolved.iter_mut().find(|u| u.key() == key) {
                Some(existing) => *existing = record,
                None => self.unresolved.push(record),
            }
            summary.unresolved_upserted += 1;
        }

        summary
    }
}
