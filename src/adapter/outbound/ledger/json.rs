//! File-backed prediction ledger.
//!
//! Layout under the root directory:
//!
//! ```text
//! {YYYY}/{MM}/resolved.json
//! {YYYY}/{MM}/unresolved.json
//! stats/latest.json
//! stats/{YYYYMMDDTHHMMSSZ}.json
//! ```
//!
//! Partition files hold `{"version": 2, "records": [...]}`. A bare array is a
//! version-1 file and is migrated record by record through [`super::legacy`].
//! A version-1 resolved record that no longer passes the resolution rules
//! loads as unresolved.
//!
//! A record that cannot be decoded is skipped with a warning. When its
//! partition is next rewritten, the raw record is appended to
//! `{YYYY}/{MM}/rejected.json` so it is never silently lost.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{legacy, LedgerState};
use crate::domain::{
    PredictionKey, Resolution, ResolvedPrediction, StatsReport, UnresolvedPrediction,
};
use crate::error::{Error, Result};
use crate::port::outbound::ledger::{CommitSummary, LedgerBatch, PredictionLedger};

/// Current partition file version.
pub const LEDGER_VERSION: u32 = 2;

const RESOLVED_FILE: &str = "resolved.json";
const UNRESOLVED_FILE: &str = "unresolved.json";
const REJECTED_FILE: &str = "rejected.json";
const STATS_DIR: &str = "stats";
const LATEST_STATS: &str = "latest.json";

/// (year, month) of a partition.
type Partition = (i32, u32);

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    version: u32,
    records: &'a [T],
}

#[derive(Deserialize)]
struct EnvelopeIn {
    version: u32,
    records: Vec<Value>,
}

/// Record decoders for one kind of partition file.
struct Decoders {
    v1: fn(Value) -> Result<Resolution>,
    current: fn(Value) -> Result<Resolution>,
}

const RESOLVED_DECODERS: Decoders = Decoders {
    v1: legacy::resolved_from_v1,
    current: decode_resolved,
};

const UNRESOLVED_DECODERS: Decoders = Decoders {
    v1: decode_unresolved_v1,
    current: decode_unresolved,
};

fn decode_resolved(value: Value) -> Result<Resolution> {
    Ok(Resolution::Resolved(serde_json::from_value(value)?))
}

fn decode_unresolved(value: Value) -> Result<Resolution> {
    Ok(Resolution::Unresolved(serde_json::from_value(value)?))
}

fn decode_unresolved_v1(value: Value) -> Result<Resolution> {
    legacy::unresolved_from_v1(value).map(Resolution::Unresolved)
}

/// Ledger contents plus the raw records that failed to decode.
#[derive(Default)]
struct Loaded {
    state: LedgerState,
    rejected: BTreeMap<Partition, Vec<Value>>,
}

impl Loaded {
    fn push(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Resolved(r) => self.state.resolved.push(r),
            Resolution::Unresolved(u) => self.state.unresolved.push(u),
        }
    }
}

/// A ledger stored as JSON files partitioned by publish year and month.
pub struct JsonLedger {
    root: PathBuf,
    // Serializes read-modify-write commits within one process.
    write_lock: Mutex<()>,
}

impl JsonLedger {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn partition_dir(&self, (year, month): Partition) -> PathBuf {
        self.root.join(format!("{year:04}")).join(format!("{month:02}"))
    }

    /// Existing partitions in chronological order.
    fn partitions(&self) -> Result<Vec<Partition>> {
        let mut found = Vec::new();
        if !self.root.is_dir() {
            return Ok(found);
        }
        for year_entry in fs::read_dir(&self.root)? {
            let year_entry = year_entry?;
            let Some(year) = numeric_dir(&year_entry, 4) else {
                continue;
            };
            for month_entry in fs::read_dir(year_entry.path())? {
                let month_entry = month_entry?;
                if let Some(month) = numeric_dir(&month_entry, 2) {
                    found.push((year, month.unsigned_abs()));
                }
            }
        }
        found.sort_unstable();
        Ok(found)
    }

    fn load(&self) -> Result<Loaded> {
        let mut loaded = Loaded::default();
        for partition in self.partitions()? {
            let dir = self.partition_dir(partition);
            for (file, decoders) in [
                (RESOLVED_FILE, &RESOLVED_DECODERS),
                (UNRESOLVED_FILE, &UNRESOLVED_DECODERS),
            ] {
                let (records, rejected) = read_partition(&dir.join(file), decoders)?;
                for resolution in records {
                    loaded.push(resolution);
                }
                if !rejected.is_empty() {
                    loaded.rejected.entry(partition).or_default().extend(rejected);
                }
            }
        }
        Ok(loaded)
    }

    fn load_state(&self) -> Result<LedgerState> {
        Ok(self.load()?.state)
    }

    fn write_partitions(
        &self,
        state: &LedgerState,
        rejected: &BTreeMap<Partition, Vec<Value>>,
        touched: &BTreeSet<Partition>,
    ) -> Result<()> {
        for &partition in touched {
            let resolved: Vec<&ResolvedPrediction> = state
                .resolved
                .iter()
                .filter(|r| partition_of(r.prediction.published_at) == partition)
                .collect();
            let unresolved: Vec<&UnresolvedPrediction> = state
                .unresolved
                .iter()
                .filter(|u| partition_of(u.prediction.published_at) == partition)
                .collect();

            let dir = self.partition_dir(partition);
            fs::create_dir_all(&dir)?;
            write_envelope(&dir.join(RESOLVED_FILE), &resolved)?;
            write_envelope(&dir.join(UNRESOLVED_FILE), &unresolved)?;
            if let Some(records) = rejected.get(&partition) {
                quarantine(&dir.join(REJECTED_FILE), records)?;
            }
            debug!(
                partition = %dir.display(),
                resolved = resolved.len(),
                unresolved = unresolved.len(),
                "Partition written"
            );
        }
        Ok(())
    }

    /// Rewrite every partition in the current format.
    ///
    /// Returns the number of partitions written. Records that cannot be
    /// migrated are moved to the partition's `rejected.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if any partition file cannot be read or written.
    pub async fn migrate(&self) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let loaded = self.load()?;
        let touched: BTreeSet<Partition> = self.partitions()?.into_iter().collect();
        self.write_partitions(&loaded.state, &loaded.rejected, &touched)?;
        info!(
            partitions = touched.len(),
            rejected = loaded.rejected.values().map(Vec::len).sum::<usize>(),
            "Ledger migrated"
        );
        Ok(touched.len())
    }
}

#[async_trait]
impl PredictionLedger for JsonLedger {
    async fn load_resolved(&self) -> Result<Vec<ResolvedPrediction>> {
        Ok(self.load_state()?.resolved)
    }

    async fn load_unresolved(&self) -> Result<Vec<UnresolvedPrediction>> {
        Ok(self.load_state()?.unresolved)
    }

    async fn commit(&self, batch: LedgerBatch) -> Result<CommitSummary> {
        if batch.is_empty() {
            return Ok(CommitSummary::default());
        }
        let _guard = self.write_lock.lock().await;

        let mut touched: BTreeSet<Partition> = batch
            .resolved
            .iter()
            .map(|r| partition_of(r.prediction.published_at))
            .chain(
                batch
                    .unresolved
                    .iter()
                    .map(|u| partition_of(u.prediction.published_at)),
            )
            .collect();

        let Loaded {
            mut state,
            rejected,
        } = self.load()?;
        let before: Vec<(PredictionKey, Partition)> = state
            .unresolved
            .iter()
            .map(|u| (u.key(), partition_of(u.prediction.published_at)))
            .collect();
        let summary = state.apply(batch);

        // Partitions that lost an unresolved entry are rewritten as well.
        let remaining: HashSet<PredictionKey> =
            state.unresolved.iter().map(UnresolvedPrediction::key).collect();
        touched.extend(
            before
                .into_iter()
                .filter(|(key, _)| !remaining.contains(key))
                .map(|(_, partition)| partition),
        );

        self.write_partitions(&state, &rejected, &touched)?;
        info!(
            resolved_added = summary.resolved_added,
            resolved_skipped = summary.resolved_skipped,
            unresolved_upserted = summary.unresolved_upserted,
            unresolved_cleared = summary.unresolved_cleared,
            partitions = touched.len(),
            "Ledger committed"
        );
        Ok(summary)
    }

    async fn save_stats(&self, report: &StatsReport) -> Result<()> {
        let dir = self.root.join(STATS_DIR);
        fs::create_dir_all(&dir)?;
        let body = serde_json::to_vec_pretty(report)?;
        let stamped = format!("{}.json", report.generated_at.format("%Y%m%dT%H%M%SZ"));
        write_atomic(&dir.join(stamped), &body)?;
        write_atomic(&dir.join(LATEST_STATS), &body)?;
        Ok(())
    }

    async fn load_stats(&self) -> Result<Option<StatsReport>> {
        let path = self.root.join(STATS_DIR).join(LATEST_STATS);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

fn partition_of(published_at: DateTime<Utc>) -> Partition {
    (published_at.year(), published_at.month())
}

/// Parse a directory name made of exactly `width` ASCII digits.
fn numeric_dir(entry: &fs::DirEntry, width: usize) -> Option<i32> {
    if !entry.file_type().ok()?.is_dir() {
        return None;
    }
    let name = entry.file_name();
    let name = name.to_str()?;
    if name.len() != width || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// Read one partition file, migrating version-1 content.
///
/// Returns the decoded records and the raw records that failed to decode.
///
/// # Errors
///
/// Returns an error only when the file as a whole is unreadable.
fn read_partition(path: &Path, decoders: &Decoders) -> Result<(Vec<Resolution>, Vec<Value>)> {
    if !path.exists() {
        return Ok((Vec::new(), Vec::new()));
    }
    let bytes = fs::read(path)?;
    let value: Value = serde_json::from_slice(&bytes)?;

    let (records, decode) = match value {
        Value::Array(records) => {
            debug!(path = %path.display(), records = records.len(), "Migrating version-1 partition");
            (records, decoders.v1)
        }
        Value::Object(_) => {
            let envelope: EnvelopeIn = serde_json::from_value(value)?;
            match envelope.version {
                1 => (envelope.records, decoders.v1),
                LEDGER_VERSION => (envelope.records, decoders.current),
                other => {
                    return Err(Error::Parse(format!(
                        "{}: unsupported ledger version {other}",
                        path.display()
                    )))
                }
            }
        }
        _ => {
            return Err(Error::Parse(format!(
                "{}: expected an array or a versioned envelope",
                path.display()
            )))
        }
    };

    let mut decoded = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();
    for raw in records {
        match decode(raw.clone()) {
            Ok(resolution) => decoded.push(resolution),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    video_id = raw.get("videoId").and_then(serde_json::Value::as_str).unwrap_or("?"),
                    error = %e,
                    "Skipping undecodable ledger record"
                );
                rejected.push(raw);
            }
        }
    }
    Ok((decoded, rejected))
}

/// Append raw records to a partition's reject file.
fn quarantine(path: &Path, records: &[Value]) -> Result<()> {
    let mut all: Vec<Value> = if path.exists() {
        serde_json::from_slice(&fs::read(path)?)?
    } else {
        Vec::new()
    };
    all.extend_from_slice(records);
    write_atomic(path, &serde_json::to_vec_pretty(&all)?)
}

fn write_envelope<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let body = serde_json::to_vec_pretty(&EnvelopeOut {
        version: LEDGER_VERSION,
        records,
    })?;
    write_atomic(path, &body)
}

/// Write through a sibling temp file and rename over the target.
fn write_atomic(path: &Path, body: &[u8]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UnresolvedReason;
    use crate::testkit::domain::{resolved, resolved_at, unresolved};
    use chrono::TimeZone;
    use serde_json::json;

    fn ledger() -> (tempfile::TempDir, JsonLedger) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = JsonLedger::new(dir.path());
        (dir, ledger)
    }

    #[tokio::test]
    async fn empty_root_loads_nothing() {
        let (_dir, ledger) = ledger();
        assert!(ledger.load_resolved().await.unwrap().is_empty());
        assert!(ledger.load_unresolved().await.unwrap().is_empty());
        assert!(ledger.load_stats().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn commit_writes_month_partitions() {
        let (dir, ledger) = ledger();
        let january = resolved_at(
            "v1",
            "Bitcoin",
            true,
            Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap(),
        );
        let february = resolved_at(
            "v2",
            "Tesla",
            false,
            Utc.with_ymd_and_hms(2025, 2, 3, 1, 0, 0).unwrap(),
        );

        ledger
            .commit(LedgerBatch {
                resolved: vec![january, february],
                unresolved: vec![],
            })
            .await
            .unwrap();

        let jan_file = dir.path().join("2025/01/resolved.json");
        let feb_file = dir.path().join("2025/02/resolved.json");
        assert!(jan_file.exists());
        assert!(feb_file.exists());

        let envelope: Value = serde_json::from_slice(&fs::read(jan_file).unwrap()).unwrap();
        assert_eq!(envelope["version"], 2);
        assert_eq!(envelope["records"].as_array().unwrap().len(), 1);
        assert_eq!(ledger.load_resolved().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn commit_round_trips_and_clears_unresolved() {
        let (_dir, ledger) = ledger();
        ledger
            .commit(LedgerBatch {
                resolved: vec![],
                unresolved: vec![unresolved("v1", "Bitcoin", UnresolvedReason::NoMarketData)],
            })
            .await
            .unwrap();
        assert_eq!(ledger.load_unresolved().await.unwrap().len(), 1);

        let summary = ledger
            .commit(LedgerBatch {
                resolved: vec![resolved("v1", "Bitcoin", true)],
                unresolved: vec![],
            })
            .await
            .unwrap();

        assert_eq!(summary.resolved_added, 1);
        assert_eq!(summary.unresolved_cleared, 1);
        assert!(ledger.load_unresolved().await.unwrap().is_empty());
        let stored = ledger.load_resolved().await.unwrap();
        assert_eq!(stored, vec![resolved("v1", "Bitcoin", true)]);
    }

    #[tokio::test]
    async fn version_one_arrays_are_migrated() {
        let (dir, ledger) = ledger();
        let partition = dir.path().join("2024/12");
        fs::create_dir_all(&partition).unwrap();
        fs::write(
            partition.join(UNRESOLVED_FILE),
            serde_json::to_vec(&json!([{
                "videoId": "old1",
                "title": "테슬라 폭락",
                "publishedAt": "2024-12-02T03:00:00Z",
                "asset": "Tesla",
                "reason": "no_market_data",
                "positiveScore": 0,
                "negativeScore": 2
            }]))
            .unwrap(),
        )
        .unwrap();

        let loaded = ledger.load_unresolved().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].prediction.asset, "Tesla");

        assert_eq!(ledger.migrate().await.unwrap(), 1);
        let rewritten: Value =
            serde_json::from_slice(&fs::read(partition.join(UNRESOLVED_FILE)).unwrap()).unwrap();
        assert_eq!(rewritten["version"], 2);
        assert_eq!(ledger.load_unresolved().await.unwrap(), loaded);
    }

    #[tokio::test]
    async fn future_version_is_rejected() {
        let (dir, ledger) = ledger();
        let partition = dir.path().join("2025/03");
        fs::create_dir_all(&partition).unwrap();
        fs::write(
            partition.join(RESOLVED_FILE),
            br#"{"version": 9, "records": []}"#,
        )
        .unwrap();

        assert!(matches!(
            ledger.load_resolved().await,
            Err(Error::Parse(_))
        ));
    }

    #[tokio::test]
    async fn stray_directories_are_ignored() {
        let (dir, ledger) = ledger();
        fs::create_dir_all(dir.path().join("stats")).unwrap();
        fs::create_dir_all(dir.path().join("2025/notes")).unwrap();
        assert!(ledger.load_resolved().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stats_artifact_written_twice() {
        let (dir, ledger) = ledger();
        let report = StatsReport {
            generated_at: Utc.with_ymd_and_hms(2025, 1, 11, 12, 30, 0).unwrap(),
            total_videos: 3,
            total_predictions: 4,
            resolved: 2,
            pending: 2,
            honey_count: 1,
            honey_index: 50.0,
            asset_stats: vec![],
            recent: vec![],
        };

        ledger.save_stats(&report).await.unwrap();

        assert!(dir.path().join("stats/20250111T123000Z.json").exists());
        assert_eq!(ledger.load_stats().await.unwrap(), Some(report));
    }

    fn write_v1(dir: &Path, file: &str, records: Value) {
        let partition = dir.join("2025/01");
        fs::create_dir_all(&partition).unwrap();
        fs::write(partition.join(file), serde_json::to_vec(&records).unwrap()).unwrap();
    }

    fn good_and_bad_unresolved() -> Value {
        json!([
            {
                "videoId": "good",
                "publishedAt": "2025-01-10T09:00:00Z",
                "asset": "Tesla",
                "reason": "no_market_data",
                "positiveScore": 0,
                "negativeScore": 2
            },
            {
                "videoId": "bad",
                "publishedAt": "2025-01-10T09:00:00Z",
                "asset": "Tesla",
                "reason": "llm_failed"
            }
        ])
    }

    #[tokio::test]
    async fn undecodable_record_does_not_hide_its_neighbours() {
        let (dir, ledger) = ledger();
        write_v1(dir.path(), UNRESOLVED_FILE, good_and_bad_unresolved());

        let loaded = ledger.load_unresolved().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].prediction.video_id.as_str(), "good");
        assert!(ledger.load_resolved().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rewritten_partition_keeps_rejected_records() {
        let (dir, ledger) = ledger();
        write_v1(dir.path(), UNRESOLVED_FILE, good_and_bad_unresolved());

        ledger
            .commit(LedgerBatch {
                resolved: vec![resolved("v1", "Bitcoin", true)],
                unresolved: vec![],
            })
            .await
            .unwrap();

        let rejected: Vec<Value> =
            serde_json::from_slice(&fs::read(dir.path().join("2025/01/rejected.json")).unwrap())
                .unwrap();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0]["videoId"], "bad");
        assert_eq!(ledger.load_unresolved().await.unwrap().len(), 1);
        assert_eq!(ledger.load_resolved().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn flat_legacy_verdict_loads_as_unresolved() {
        let (dir, ledger) = ledger();
        write_v1(
            dir.path(),
            RESOLVED_FILE,
            json!([{
                "videoId": "k1",
                "title": "코스피 하락 온다",
                "publishedAt": "2025-01-10T09:00:00Z",
                "analysis": {
                    "detectedAssets": [{"asset": "KOSPI"}],
                    "toneAnalysis": {"tone": "negative"}
                },
                "marketData": {
                    "asset": "KOSPI",
                    "ticker": "^KS11",
                    "closePrice": 2500,
                    "previousClose": 2500,
                    "direction": "flat"
                },
                "judgment": {
                    "predictedDirection": "bearish",
                    "actualDirection": "bearish",
                    "isHoney": false
                }
            }]),
        );

        assert!(ledger.load_resolved().await.unwrap().is_empty());
        let unresolved = ledger.load_unresolved().await.unwrap();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].reason, UnresolvedReason::FlatMarket);

        ledger.migrate().await.unwrap();
        let rewritten: Value = serde_json::from_slice(
            &fs::read(dir.path().join("2025/01/unresolved.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(rewritten["records"][0]["reason"], "flat_market");
    }
}
