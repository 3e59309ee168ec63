//! Honey-index aggregation over resolved predictions.

use std::collections::BTreeMap;

use crate::domain::{AssetStats, HoneyStats, ResolvedPrediction, Tally};

/// Fold resolved predictions into overall and per-asset honey indices.
///
/// An empty input yields an index of 0.
#[must_use]
pub fn aggregate(resolved: &[ResolvedPrediction]) -> HoneyStats {
    let mut overall = Tally::default();
    let mut per_asset: BTreeMap<String, Tally> = BTreeMap::new();

    for record in resolved {
        overall.record(record.is_honey());
        per_asset
            .entry(record.prediction.asset.clone())
            .or_default()
            .record(record.is_honey());
    }

    HoneyStats {
        overall,
        overall_index: overall.index(),
        per_asset: per_asset
            .into_iter()
            .map(|(asset, tally)| {
                let stats = AssetStats::from_tally(asset.clone(), tally);
                (asset, stats)
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::resolved;

    #[test]
    fn empty_set_has_zero_index() {
        let stats = aggregate(&[]);
        assert_eq!(stats.overall_index, 0.0);
        assert!(stats.per_asset.is_empty());
    }

    #[test]
    fn overall_and_per_asset_indices() {
        let mut records = Vec::new();
        for i in 0..10 {
            records.push(resolved(&format!("b{i}"), "Bitcoin", i < 3));
        }
        records.push(resolved("t0", "Tesla", true));

        let stats = aggregate(&records);

        assert_eq!(stats.overall.total, 11);
        assert_eq!(stats.overall.honey_count, 4);
        let btc = &stats.per_asset["Bitcoin"];
        assert_eq!(btc.total, 10);
        assert!((btc.honey_index - 30.0).abs() < 1e-9);
        assert!((stats.per_asset["Tesla"].honey_index - 100.0).abs() < 1e-9);
    }
}
