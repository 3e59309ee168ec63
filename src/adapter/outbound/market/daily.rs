//! Daily-bar source backed by an external helper process.
//!
//! The helper is invoked as `<program> <args..> <TICKER> <YYYY-MM-DD>` and
//! prints one JSON object on stdout:
//!
//! ```json
//! {"symbol": "^IXIC", "closePrice": 19630.2, "previousClose": 19478.9,
//!  "direction": "up", "tradingDay": "2025-01-10"}
//! ```
//!
//! A payload with an `error` field means the ticker has no bar for that day.
//! The call runs under a hard timeout; the child is killed when it expires.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::domain::MarketMove;
use crate::error::{Error, Result};
use crate::infrastructure::config::market::DailyMarketConfig;
use crate::port::outbound::market::{DailyBarSource, DailyClose};

/// Daily bars fetched by running a helper program.
pub struct ProcessDailyBars {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessDailyBars {
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &DailyMarketConfig) -> Self {
        Self::new(
            config.program.clone(),
            config.args.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl DailyBarSource for ProcessDailyBars {
    async fn daily_close(&self, ticker: &str, date: NaiveDate) -> Result<Option<DailyClose>> {
        let date_arg = date.format("%Y-%m-%d").to_string();
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(ticker)
            .arg(&date_arg)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(output) => output?,
            Err(_) => {
                return Err(Error::Timeout {
                    seconds: self.timeout.as_secs(),
                })
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let parsed = parse_payload(stdout.trim(), ticker, date);
        if !output.status.success() && parsed.is_err() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Process(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let bar = parsed?;
        debug!(ticker, date = %date_arg, found = bar.is_some(), "daily bar fetched");
        Ok(bar)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BarPayload {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    close_price: Option<Decimal>,
    #[serde(default)]
    previous_close: Option<Decimal>,
    #[serde(default)]
    direction: Option<String>,
    #[serde(default)]
    trading_day: Option<NaiveDate>,
    #[serde(default)]
    date: Option<NaiveDate>,
}

/// Decode the helper's stdout. `Ok(None)` for an `error` payload or a bar
/// missing either close.
fn parse_payload(stdout: &str, ticker: &str, requested: NaiveDate) -> Result<Option<DailyClose>> {
    let payload: BarPayload = serde_json::from_str(stdout)
        .map_err(|e| Error::Parse(format!("daily bar payload: {e}")))?;

    if let Some(error) = payload.error {
        debug!(ticker, error = %error, "daily bar source reported no data");
        return Ok(None);
    }

    let (Some(close), Some(previous_close)) = (payload.close_price, payload.previous_close) else {
        return Ok(None);
    };

    Ok(Some(DailyClose {
        ticker: payload.symbol.unwrap_or_else(|| ticker.to_string()),
        close,
        previous_close,
        trading_date: payload.trading_day.or(payload.date).unwrap_or(requested),
        direction: payload.direction.as_deref().and_then(parse_direction),
    }))
}

fn parse_direction(raw: &str) -> Option<MarketMove> {
    match raw {
        "up" => Some(MarketMove::Up),
        "down" => Some(MarketMove::Down),
        "flat" => Some(MarketMove::Flat),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_bar() {
        let bar = parse_payload(
            r#"{"symbol": "^IXIC", "closePrice": "19630.2", "previousClose": "19478.9",
                "direction": "up", "tradingDay": "2025-01-10"}"#,
            "^IXIC",
            day(2025, 1, 11),
        )
        .unwrap()
        .unwrap();

        assert_eq!(bar.close, dec!(19630.2));
        assert_eq!(bar.previous_close, dec!(19478.9));
        assert_eq!(bar.trading_date, day(2025, 1, 10));
        assert_eq!(bar.direction, Some(MarketMove::Up));
    }

    #[test]
    fn error_payload_is_no_data() {
        let bar = parse_payload(r#"{"error": "not found"}"#, "XYZ", day(2025, 1, 10)).unwrap();
        assert!(bar.is_none());
    }

    #[test]
    fn missing_previous_close_is_no_data() {
        let bar = parse_payload(r#"{"closePrice": "10"}"#, "XYZ", day(2025, 1, 10)).unwrap();
        assert!(bar.is_none());
    }

    #[test]
    fn falls_back_to_requested_ticker_and_date() {
        let bar = parse_payload(
            r#"{"closePrice": "10", "previousClose": "10", "direction": "flat"}"#,
            "005930.KS",
            day(2025, 1, 10),
        )
        .unwrap()
        .unwrap();
        assert_eq!(bar.ticker, "005930.KS");
        assert_eq!(bar.trading_date, day(2025, 1, 10));
        assert_eq!(bar.direction, Some(MarketMove::Flat));
    }

    #[test]
    fn non_json_is_parse_error() {
        assert!(matches!(
            parse_payload("Traceback (most recent call last)", "X", day(2025, 1, 10)),
            Err(Error::Parse(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn helper_process_error_payload_is_none() {
        let source = ProcessDailyBars::new(
            "sh",
            vec!["-c".into(), r#"echo '{"error": "not found"}'"#.into(), "helper".into()],
            Duration::from_secs(5),
        );
        let bar = source.daily_close("NOPE", day(2025, 1, 10)).await.unwrap();
        assert!(bar.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn helper_process_timeout_is_error() {
        let source = ProcessDailyBars::new(
            "sh",
            vec!["-c".into(), "sleep 5".into(), "helper".into()],
            Duration::from_millis(100),
        );
        let result = source.daily_close("SLOW", day(2025, 1, 10)).await;
        assert!(matches!(result, Err(Error::Timeout { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_program_is_error() {
        let source = ProcessDailyBars::new(
            "/nonexistent/helper-binary",
            Vec::new(),
            Duration::from_secs(1),
        );
        assert!(source.daily_close("X", day(2025, 1, 10)).await.is_err());
    }
}
