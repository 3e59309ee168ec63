//! Market-data factory.

use std::sync::Arc;
use std::time::Duration;

use crate::adapter::outbound::market::{BinanceCandles, MarketDataResolver, ProcessDailyBars};
use crate::infrastructure::config::market::MarketConfig;
use crate::port::outbound::market::MarketData;

/// Build the class-dispatching market-data source.
#[must_use]
pub fn build_market_data(config: &MarketConfig) -> Arc<dyn MarketData> {
    Arc::new(MarketDataResolver::new(
        Arc::new(BinanceCandles::from_config(&config.crypto)),
        Arc::new(ProcessDailyBars::from_config(&config.daily)),
        Duration::from_millis(config.crypto.pace_ms),
    ))
}
