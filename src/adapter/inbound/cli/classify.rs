//! Handler for `honeylab classify`.

use chrono::Utc;
use serde_json::json;

use super::command::ClassifyArgs;
use super::output;
use crate::domain::Video;
use crate::error::Result;
use crate::infrastructure::factory::Runtime;

/// Classify one title and print the detected assets and tone.
///
/// # Errors
///
/// Returns an error if the classifier cannot be built (for example a
/// missing API key for the `llm` strategy).
pub async fn execute(runtime: &Runtime, args: &ClassifyArgs) -> Result<()> {
    let classifier = runtime.classifier(args.strategy)?;
    let video = Video::new("adhoc", args.title.clone(), "", Utc::now());
    let result = classifier.classify(&video).await;

    if output::is_json() {
        output::json_output(json!({
            "command": "classify",
            "title": args.title,
            "result": result,
        }));
        return Ok(());
    }

    output::section("Classification");
    output::field("Strategy", classifier.name());
    output::field("Tone", output::highlight(result.tone()));
    if let Some(direction) = result.tone_analysis.direction() {
        output::field("Call", direction);
    }
    if !result.tone_analysis.keywords.is_empty() {
        output::field("Keywords", result.tone_analysis.keywords.join(", "));
    }
    if result.detected_assets.is_empty() {
        output::field("Assets", output::muted("none"));
    }
    for asset in &result.detected_assets {
        let ticker = if asset.is_known() {
            output::positive(&asset.ticker)
        } else {
            output::negative(&asset.ticker)
        };
        output::field(
            "Asset",
            format!("{} {} ({:.2})", asset.asset, ticker, asset.confidence),
        );
    }
    if result.degraded {
        output::warning(&result.tone_analysis.reasoning);
    }
    Ok(())
}
