//! Handler for `honeylab migrate`.

use serde_json::json;

use super::output;
use crate::error::Result;
use crate::infrastructure::factory::Runtime;

/// Rewrite every ledger partition in the current envelope format.
///
/// # Errors
///
/// Returns an error if a partition cannot be parsed or written.
pub async fn execute(runtime: &Runtime) -> Result<()> {
    let ledger = runtime.json_ledger();
    let written = ledger.migrate().await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "migrate",
            "partitions": written,
        }));
        return Ok(());
    }

    output::success(&format!(
        "Rewrote {written} partitions under {}",
        ledger.root().display()
    ));
    Ok(())
}
