//! Handler for `honeylab collect`.

use chrono::Utc;
use serde_json::json;

use super::command::CollectArgs;
use super::{output, stats};
use crate::application::CollectSummary;
use crate::error::Result;
use crate::infrastructure::factory::Runtime;

/// Run one collection and print its summary.
///
/// # Errors
///
/// Returns an error if a credential is missing, the video source fails, or
/// the ledger cannot be written.
pub async fn execute(runtime: &Runtime, args: &CollectArgs) -> Result<()> {
    let pipeline = runtime.collection(args.days, args.strategy)?;

    output::header(env!("CARGO_PKG_VERSION"));
    output::action("Collecting", &runtime.config().collection.channel_id);

    let (summary, report) = pipeline.run(Utc::now()).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "collect",
            "summary": summary_json(&summary),
            "stats": report,
        }));
        return Ok(());
    }

    print_summary(&summary);
    stats::print_headline(&report);
    Ok(())
}

fn summary_json(summary: &CollectSummary) -> serde_json::Value {
    json!({
        "videos": summary.videos,
        "degraded": summary.degraded,
        "predictions": summary.predictions,
        "already_resolved": summary.already_resolved,
        "resolved": summary.resolved,
        "honey": summary.honey,
        "unresolved": summary.unresolved,
        "resolved_added": summary.commit.resolved_added,
        "unresolved_upserted": summary.commit.unresolved_upserted,
    })
}

fn print_summary(summary: &CollectSummary) {
    output::section("Run");
    output::field("Videos", summary.videos);
    output::field("Predictions", summary.predictions);
    output::field("Resolved", summary.resolved);
    output::field("Honey", output::positive(summary.honey));
    output::field("Unresolved", summary.unresolved);
    if summary.already_resolved > 0 {
        output::field("Skipped", output::muted(summary.already_resolved));
    }
    if summary.degraded > 0 {
        output::warning(&format!(
            "{} titles fell back to an empty classification",
            summary.degraded
        ));
    }
    if summary.commit.resolved_added == 0 && summary.commit.unresolved_upserted == 0 {
        output::success("Ledger already up to date");
    } else {
        output::success(&format!(
            "Ledger updated: {} resolved, {} unresolved",
            summary.commit.resolved_added, summary.commit.unresolved_upserted
        ));
    }
}
