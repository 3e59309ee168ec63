//! Market-data source configuration.

use serde::Deserialize;

/// `[market]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketConfig {
    #[serde(default)]
    pub crypto: CryptoMarketConfig,
    #[serde(default)]
    pub daily: DailyMarketConfig,
}

/// Hourly candle source for crypto assets.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CryptoMarketConfig {
    /// Exchange REST base URL.
    pub base_url: String,
    /// Kline interval.
    pub interval: String,
    /// Minimum gap between two candle requests.
    pub pace_ms: u64,
    pub timeout_secs: u64,
}

impl Default for CryptoMarketConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".into(),
            interval: "1h".into(),
            pace_ms: 50,
            timeout_secs: 10,
        }
    }
}

/// Daily-bar helper process for stocks and indices.
///
/// Invoked as `program args.. TICKER YYYY-MM-DD`; prints one JSON object.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DailyMarketConfig {
    pub program: String,
    pub args: Vec<String>,
    /// A call running longer than this is killed and counts as a failure.
    pub timeout_secs: u64,
}

impl Default for DailyMarketConfig {
    fn default() -> Self {
        Self {
            program: "python3".into(),
            args: vec!["scripts/market_data.py".into(), "close".into()],
            timeout_secs: 30,
        }
    }
}
