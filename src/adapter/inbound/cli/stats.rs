//! Handler for `honeylab stats`.

use chrono::Utc;
use tabled::{Table, Tabled};

use super::command::StatsArgs;
use super::output;
use crate::application::build_report;
use crate::domain::{RecentPrediction, RecentStatus, StatsReport};
use crate::error::Result;
use crate::infrastructure::factory::Runtime;

#[derive(Tabled)]
struct AssetRow {
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Resolved")]
    total: u64,
    #[tabled(rename = "Honey")]
    honey: u64,
    #[tabled(rename = "Index")]
    index: String,
}

#[derive(Tabled)]
struct RecentRow {
    #[tabled(rename = "Published")]
    published: String,
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Call")]
    call: String,
    #[tabled(rename = "Move")]
    actual: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Title")]
    title: String,
}

/// Print the honey index computed from the current ledger contents.
///
/// Read-only: the stats artifact on disk is refreshed by `collect` and
/// `recover`, not here.
///
/// # Errors
///
/// Returns an error if the ledger cannot be read.
pub async fn execute(runtime: &Runtime, args: &StatsArgs) -> Result<()> {
    let ledger = runtime.ledger();
    let resolved = ledger.load_resolved().await?;
    let unresolved = ledger.load_unresolved().await?;
    let limit = args
        .limit
        .unwrap_or(runtime.config().collection.recent_limit);
    let report = build_report(&resolved, &unresolved, limit, Utc::now());

    if output::is_json() {
        output::json_output(serde_json::to_value(&report)?);
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    print_headline(&report);

    if !report.asset_stats.is_empty() {
        output::section("By asset");
        let rows: Vec<AssetRow> = report
            .asset_stats
            .iter()
            .map(|a| AssetRow {
                asset: a.asset.clone(),
                total: a.total,
                honey: a.honey_count,
                index: output::percent(a.honey_index),
            })
            .collect();
        output::lines(&Table::new(rows).to_string());
    }

    if !report.recent.is_empty() {
        output::section("Recent");
        let rows: Vec<RecentRow> = report.recent.iter().map(recent_row).collect();
        output::lines(&Table::new(rows).to_string());
    }
    Ok(())
}

/// Print the overall counters.
pub fn print_headline(report: &StatsReport) {
    output::section("Honey index");
    output::field("Index", output::highlight(output::percent(report.honey_index)));
    output::field(
        "Honey",
        format!("{} of {}", report.honey_count, report.resolved),
    );
    output::field("Pending", report.pending);
    output::field("Predictions", report.total_predictions);
    output::field("Videos", report.total_videos);
}

fn recent_row(r: &RecentPrediction) -> RecentRow {
    let direction = |d: Option<crate::domain::Direction>| {
        d.map_or_else(|| "-".to_string(), |d| d.to_string())
    };
    let actual = match (r.actual_direction, r.price_change) {
        (Some(d), Some(change)) => format!("{d} ({}%)", change.round_dp(2).normalize()),
        (Some(d), None) => d.to_string(),
        _ => "-".to_string(),
    };
    RecentRow {
        published: r.published_at.format("%Y-%m-%d").to_string(),
        asset: r.asset.clone(),
        call: direction(r.predicted_direction),
        actual,
        status: match r.status {
            RecentStatus::Correct => "honey",
            RecentStatus::Incorrect => "held",
            RecentStatus::Pending => "pending",
        },
        title: truncate(&r.title, 40),
    }
}

fn truncate(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }
    let mut out: String = title.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::resolved;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("비트코인", 10), "비트코인");
        assert_eq!(truncate("비트코인 지금 사야", 5), "비트코인…");
    }

    #[test]
    fn honey_row_shows_move_and_status() {
        let report = build_report(&[resolved("v1", "Bitcoin", true)], &[], 20, Utc::now());
        let row = recent_row(&report.recent[0]);
        assert_eq!(row.status, "honey");
        assert_eq!(row.call, "bullish");
        assert_eq!(row.actual, "bearish (-10%)");
    }
}
