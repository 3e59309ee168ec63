//! Market-data ports.
//!
//! [`CandleSource`] and [`DailyBarSource`] are the raw upstream collaborators
//! and surface their failures as errors. [`MarketData`] is the resolver on
//! top of them and swallows every failure into `None`.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::domain::{AssetDefinition, MarketMove, PriceWindow};
use crate::error::Result;

/// Hour-granularity exchange candles.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Close of the first candle opening at or after `at`, or `None` when the
    /// exchange has no candle there.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a malformed
    /// payload.
    async fn close_at_or_after(&self, symbol: &str, at: DateTime<Utc>) -> Result<Option<Decimal>>;
}

/// One trading day's close and the close of the trading day before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyClose {
    pub ticker: String,
    pub close: Decimal,
    pub previous_close: Decimal,
    pub trading_date: NaiveDate,
    /// The source's own direction call, if it reports one.
    pub direction: Option<MarketMove>,
}

/// Daily bars for equities and indices.
#[async_trait]
pub trait DailyBarSource: Send + Sync {
    /// Close for the trading day containing `date`, or `None` when the
    /// ticker has no bar there.
    ///
    /// # Errors
    ///
    /// Returns an error when the source cannot be reached, times out, or
    /// answers with something other than a bar or an `error` payload.
    async fn daily_close(&self, ticker: &str, date: NaiveDate) -> Result<Option<DailyClose>>;
}

/// Resolves an asset's price window.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Prices bracketing `published_at`. `None` covers every failure mode.
    async fn price_window(
        &self,
        asset: &AssetDefinition,
        published_at: DateTime<Utc>,
        window: Duration,
    ) -> Option<PriceWindow>;
}
