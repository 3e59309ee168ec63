//! Binance kline client for crypto candles.
//!
//! `GET /api/v3/klines?symbol=..&interval=1h&startTime=..&limit=1` returns the
//! first candle opening at or after `startTime`. Each kline is a positional
//! array; index 4 is the close price as a decimal string.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::infrastructure::config::market::CryptoMarketConfig;
use crate::port::outbound::market::CandleSource;

/// Position of the close price inside a kline array.
const CLOSE_INDEX: usize = 4;

/// HTTP client for the Binance spot kline endpoint.
pub struct BinanceCandles {
    http: HttpClient,
    base_url: String,
    interval: String,
}

impl BinanceCandles {
    #[must_use]
    pub fn new(base_url: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.into(),
            interval: interval.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &CryptoMarketConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            interval: config.interval.clone(),
        }
    }

    fn klines_url(&self) -> String {
        format!("{}/api/v3/klines", self.base_url)
    }
}

#[async_trait]
impl CandleSource for BinanceCandles {
    async fn close_at_or_after(&self, symbol: &str, at: DateTime<Utc>) -> Result<Option<Decimal>> {
        let start_time = at.timestamp_millis().to_string();
        let response = self
            .http
            .get(self.klines_url())
            .query(&[
                ("symbol", symbol),
                ("interval", self.interval.as_str()),
                ("startTime", start_time.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let klines: Vec<Vec<Value>> = response.json().await?;
        let close = parse_first_close(&klines)?;
        debug!(symbol, at = %at, close = ?close, "kline fetched");
        Ok(close)
    }
}

/// Close of the first kline, `None` when the list is empty.
fn parse_first_close(klines: &[Vec<Value>]) -> Result<Option<Decimal>> {
    let Some(kline) = klines.first() else {
        return Ok(None);
    };
    let raw = kline
        .get(CLOSE_INDEX)
        .ok_or_else(|| Error::Parse("kline has no close field".into()))?;
    let close = match raw {
        Value::String(s) => Decimal::from_str(s),
        Value::Number(n) => Decimal::from_str(&n.to_string()),
        other => return Err(Error::Parse(format!("unexpected close value: {other}"))),
    }
    .map_err(|e| Error::Parse(format!("invalid close price: {e}")))?;
    Ok(Some(close))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn klines(json: &str) -> Vec<Vec<Value>> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn close_is_fifth_field() {
        let data = klines(
            r#"[[1736496000000, "94500.10", "95000.00", "94000.00", "94812.55", "123.4",
                 1736499599999, "0", 10, "0", "0", "0"]]"#,
        );
        assert_eq!(parse_first_close(&data).unwrap(), Some(dec!(94812.55)));
    }

    #[test]
    fn empty_kline_list_is_none() {
        assert_eq!(parse_first_close(&[]).unwrap(), None);
    }

    #[test]
    fn short_kline_is_parse_error() {
        let data = klines(r#"[[1736496000000, "1"]]"#);
        assert!(matches!(parse_first_close(&data), Err(Error::Parse(_))));
    }

    #[test]
    fn garbage_close_is_parse_error() {
        let data = klines(r#"[[0, "1", "1", "1", "abc"]]"#);
        assert!(parse_first_close(&data).is_err());
    }

    #[test]
    fn url_joins_base() {
        let client = BinanceCandles::new("https://api.binance.com", "1h");
        assert_eq!(client.klines_url(), "https://api.binance.com/api/v3/klines");
    }
}
