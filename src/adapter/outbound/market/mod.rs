//! Market-data adapters.
//!
//! - [`BinanceCandles`] - hourly crypto klines over REST
//! - [`ProcessDailyBars`] - daily bars from a helper process with a timeout
//! - [`MarketDataResolver`] - asset-class dispatch with request pacing

pub mod binance;
pub mod daily;
pub mod resolver;

pub use binance::BinanceCandles;
pub use daily::ProcessDailyBars;
pub use resolver::MarketDataResolver;
