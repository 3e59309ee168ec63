//! Handler for `honeylab recover`.

use chrono::Utc;
use serde_json::json;

use super::output;
use crate::application::refresh_stats;
use crate::error::Result;
use crate::infrastructure::factory::Runtime;

/// Retry `no_market_data` predictions and refresh the stats artifact.
///
/// # Errors
///
/// Returns an error if the ledger cannot be read or written.
pub async fn execute(runtime: &Runtime) -> Result<()> {
    output::header(env!("CARGO_PKG_VERSION"));
    output::action("Recovering", "pending predictions");

    let now = Utc::now();
    let summary = runtime.recovery().run(now).await?;
    let ledger = runtime.ledger();
    let report = refresh_stats(
        ledger.as_ref(),
        runtime.config().collection.recent_limit,
        now,
    )
    .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "recover",
            "processed": summary.processed,
            "recovered": summary.recovered,
            "failed": summary.failed,
            "reclassified": summary.reclassified,
            "honey_index": report.honey_index,
        }));
        return Ok(());
    }

    output::section("Recovery");
    output::field("Processed", summary.processed);
    output::field("Recovered", output::positive(summary.recovered));
    output::field("Failed", summary.failed);
    if summary.reclassified > 0 {
        output::field("Reclassified", output::muted(summary.reclassified));
    }
    output::field("Honey index", output::highlight(output::percent(report.honey_index)));
    Ok(())
}
