//! Fake market-data sources.
//!
//! - [`FakeCandles`]: candle closes keyed by (symbol, instant).
//! - [`FakeDailyBars`]: daily bars keyed by (ticker, date).
//! - [`FakeMarketData`]: whole price windows keyed by asset label, with a
//!   call counter.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::{AssetDefinition, PriceWindow};
use crate::error::{Error, Result};
use crate::port::outbound::market::{CandleSource, DailyBarSource, DailyClose, MarketData};

/// Candle closes at exact instants. Missing entries return `Ok(None)`.
#[derive(Default)]
pub struct FakeCandles {
    closes: HashMap<(String, DateTime<Utc>), Decimal>,
    failing: bool,
}

impl FakeCandles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with a transport-style error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_close(mut self, symbol: &str, at: DateTime<Utc>, close: Decimal) -> Self {
        self.closes.insert((symbol.to_string(), at), close);
        self
    }
}

#[async_trait]
impl CandleSource for FakeCandles {
    async fn close_at_or_after(&self, symbol: &str, at: DateTime<Utc>) -> Result<Option<Decimal>> {
        if self.failing {
            return Err(Error::Connection("candle source unreachable".into()));
        }
        Ok(self.closes.get(&(symbol.to_string(), at)).copied())
    }
}

/// Daily bars by (ticker, date). Missing entries return `Ok(None)`, the
/// same as an error payload from the real helper.
#[derive(Default)]
pub struct FakeDailyBars {
    bars: Vec<DailyClose>,
}

impl FakeDailyBars {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bar(mut self, bar: DailyClose) -> Self {
        self.bars.push(bar);
        self
    }
}

#[async_trait]
impl DailyBarSource for FakeDailyBars {
    async fn daily_close(&self, ticker: &str, date: NaiveDate) -> Result<Option<DailyClose>> {
        Ok(self
            .bars
            .iter()
            .find(|b| b.ticker == ticker && b.trading_date == date)
            .cloned())
    }
}

/// Price windows by asset label.
///
/// Windows can be swapped at runtime to simulate upstream data appearing
/// between two runs.
#[derive(Default)]
pub struct FakeMarketData {
    windows: Mutex<HashMap<String, PriceWindow>>,
    calls: AtomicUsize,
}

impl FakeMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_window(self, asset: &str, window: PriceWindow) -> Self {
        self.set_window(asset, window);
        self
    }

    pub fn set_window(&self, asset: &str, window: PriceWindow) {
        self.windows.lock().insert(asset.to_string(), window);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketData for FakeMarketData {
    async fn price_window(
        &self,
        asset: &AssetDefinition,
        _published_at: DateTime<Utc>,
        _window: Duration,
    ) -> Option<PriceWindow> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.windows.lock().get(&asset.label).cloned()
    }
}
