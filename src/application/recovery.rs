//! Recovery pass over unresolved predictions.
//!
//! Re-attempts every `no_market_data` record with the tone it already
//! carries. Records that resolve move to the resolved set; the rest are
//! upserted with their new reason. Keys already resolved are skipped, so a
//! second run over the same data changes nothing.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::resolver::PredictionResolver;
use crate::domain::{Resolution, UnresolvedReason};
use crate::error::Result;
use crate::port::outbound::ledger::{LedgerBatch, PredictionLedger};

/// Counters from one recovery run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoverySummary {
    /// Records re-attempted.
    pub processed: usize,
    /// Records that resolved.
    pub recovered: usize,
    /// Records still unresolved afterwards.
    pub failed: usize,
    /// Of the failures, how many changed reason.
    pub reclassified: usize,
}

pub struct RecoveryPass {
    resolver: Arc<PredictionResolver>,
    ledger: Arc<dyn PredictionLedger>,
}

impl RecoveryPass {
    pub fn new(resolver: Arc<PredictionResolver>, ledger: Arc<dyn PredictionLedger>) -> Self {
        Self { resolver, ledger }
    }

    /// Run the pass at `now` and commit the outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read or written. Market-data
    /// failures are not errors; they leave the record unresolved.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RecoverySummary> {
        let resolved_keys: HashSet<_> = self
            .ledger
            .load_resolved()
            .await?
            .iter()
            .map(|r| r.key())
            .collect();
        let candidates: Vec<_> = self
            .ledger
            .load_unresolved()
            .await?
            .into_iter()
            .filter(|u| u.reason.is_recoverable() && !resolved_keys.contains(&u.key()))
            .collect();

        info!(candidates = candidates.len(), "Recovery pass started");

        let mut summary = RecoverySummary::default();
        let mut batch = LedgerBatch::default();
        for record in candidates {
            summary.processed += 1;
            match self.resolver.resolve(record.prediction, now).await {
                Resolution::Resolved(resolved) => {
                    summary.recovered += 1;
                    batch.resolved.push(resolved);
                }
                Resolution::Unresolved(unresolved) => {
                    summary.failed += 1;
                    if unresolved.reason != UnresolvedReason::NoMarketData {
                        summary.reclassified += 1;
                        warn!(
                            key = %unresolved.key(),
                            reason = %unresolved.reason,
                            "Recovered market data but record is not resolvable"
                        );
                    }
                    batch.unresolved.push(unresolved);
                }
            }
        }

        self.ledger.commit(batch).await?;
        info!(
            processed = summary.processed,
            recovered = summary.recovered,
            failed = summary.failed,
            "Recovery pass finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::ledger::MemoryLedger;
    use crate::domain::{AssetRegistry, Granularity, PriceWindow, ToneAnalysis};
    use crate::testkit::domain::{published, resolved, unresolved};
    use crate::testkit::market::FakeMarketData;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn btc_down() -> PriceWindow {
        PriceWindow::from_prices("BTCUSDT", dec!(100), dec!(90), Granularity::Hourly, None).unwrap()
    }

    fn pass(market: Arc<FakeMarketData>, ledger: Arc<MemoryLedger>) -> RecoveryPass {
        let resolver = PredictionResolver::new(
            market,
            Arc::new(AssetRegistry::builtin()),
            Duration::hours(24),
        );
        RecoveryPass::new(Arc::new(resolver), ledger)
    }

    fn later() -> DateTime<Utc> {
        published() + Duration::days(3)
    }

    #[tokio::test]
    async fn recovers_when_data_appears() {
        let market = Arc::new(FakeMarketData::new());
        let ledger = Arc::new(MemoryLedger::with_records(
            vec![],
            vec![unresolved("v1", "Bitcoin", UnresolvedReason::NoMarketData)],
        ));
        let pass = pass(market.clone(), ledger.clone());

        let first = pass.run(later()).await.unwrap();
        assert_eq!(first.recovered, 0);
        assert_eq!(first.failed, 1);

        market.set_window("Bitcoin", btc_down());
        let second = pass.run(later()).await.unwrap();
        assert_eq!(second.recovered, 1);

        let state = ledger.snapshot();
        assert_eq!(state.resolved.len(), 1);
        assert!(state.resolved[0].is_honey());
        assert!(state.unresolved.is_empty());
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let market = Arc::new(FakeMarketData::new().with_window("Bitcoin", btc_down()));
        let ledger = Arc::new(MemoryLedger::with_records(
            vec![],
            vec![
                unresolved("v1", "Bitcoin", UnresolvedReason::NoMarketData),
                unresolved("v2", "Tesla", UnresolvedReason::NoMarketData),
            ],
        ));
        let pass = pass(market, ledger.clone());

        pass.run(later()).await.unwrap();
        let after_first = ledger.snapshot();
        let again = pass.run(later()).await.unwrap();
        let after_second = ledger.snapshot();

        assert_eq!(again.recovered, 0);
        assert_eq!(after_first.resolved, after_second.resolved);
        assert_eq!(after_first.unresolved.len(), after_second.unresolved.len());
        assert_eq!(after_second.resolved.len(), 1);
    }

    #[tokio::test]
    async fn tied_legacy_scores_become_neutral_tone() {
        let market = Arc::new(FakeMarketData::new().with_window("Bitcoin", btc_down()));
        let mut record = unresolved("v1", "Bitcoin", UnresolvedReason::NoMarketData);
        record.prediction.tone = Some(ToneAnalysis::from_scores(1, 1));
        let ledger = Arc::new(MemoryLedger::with_records(vec![], vec![record]));

        let summary = pass(market, ledger.clone()).run(later()).await.unwrap();

        assert_eq!(summary.reclassified, 1);
        let state = ledger.snapshot();
        assert_eq!(state.unresolved[0].reason, UnresolvedReason::NeutralTone);

        // Neutral records are no longer candidates.
        let market = Arc::new(FakeMarketData::new().with_window("Bitcoin", btc_down()));
        let rerun = pass(market, ledger).run(later()).await.unwrap();
        assert_eq!(rerun.processed, 0);
    }

    #[tokio::test]
    async fn legacy_scores_recover_with_direction() {
        let market = Arc::new(FakeMarketData::new().with_window("Bitcoin", btc_down()));
        let mut record = unresolved("v1", "Bitcoin", UnresolvedReason::NoMarketData);
        record.prediction.tone = Some(ToneAnalysis::from_scores(0, 2));
        let ledger = Arc::new(MemoryLedger::with_records(vec![], vec![record]));

        pass(market, ledger.clone()).run(later()).await.unwrap();

        let state = ledger.snapshot();
        assert_eq!(state.resolved.len(), 1);
        assert!(!state.resolved[0].is_honey());
    }

    #[tokio::test]
    async fn already_resolved_keys_are_skipped() {
        let market = Arc::new(FakeMarketData::new().with_window("Bitcoin", btc_down()));
        let ledger = Arc::new(MemoryLedger::with_records(
            vec![resolved("v1", "Bitcoin", false)],
            vec![unresolved("v1", "Bitcoin", UnresolvedReason::NoMarketData)],
        ));

        let summary = pass(market.clone(), ledger.clone()).run(later()).await.unwrap();

        assert_eq!(summary.processed, 0);
        assert_eq!(market.calls(), 0);
        assert!(!ledger.snapshot().resolved[0].is_honey());
    }
}
