//! Market data resolver.
//!
//! Dispatches on [`AssetClass`]: crypto uses two hourly candle closes
//! (publish time and publish time + window), equities and indices use the
//! daily bar of the publish date against the previous trading day's close.
//! Every upstream failure is logged and becomes `None`.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::{AssetClass, AssetDefinition, Granularity, PriceWindow};
use crate::port::outbound::market::{CandleSource, DailyBarSource, MarketData};

/// Serializes calls and keeps a minimum gap between them.
struct Pacer {
    gap: StdDuration,
    last: Mutex<Option<Instant>>,
}

impl Pacer {
    fn new(gap: StdDuration) -> Self {
        Self {
            gap,
            last: Mutex::new(None),
        }
    }

    /// Run `call` once the gap since the previous call has passed.
    async fn run<F, T>(&self, call: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        let mut last = self.last.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.gap;
            if ready_at > Instant::now() {
                debug!(gap_ms = self.gap.as_millis() as u64, "pacing candle request");
                tokio::time::sleep_until(ready_at).await;
            }
        }
        let result = call.await;
        *last = Some(Instant::now());
        result
    }
}

/// Class-dispatching [`MarketData`] implementation.
pub struct MarketDataResolver {
    candles: Arc<dyn CandleSource>,
    daily: Arc<dyn DailyBarSource>,
    pacer: Pacer,
}

impl MarketDataResolver {
    pub fn new(
        candles: Arc<dyn CandleSource>,
        daily: Arc<dyn DailyBarSource>,
        pace: StdDuration,
    ) -> Self {
        Self {
            candles,
            daily,
            pacer: Pacer::new(pace),
        }
    }

    async fn candle_close(
        &self,
        symbol: &str,
        at: DateTime<Utc>,
    ) -> Option<rust_decimal::Decimal> {
        match self
            .pacer
            .run(self.candles.close_at_or_after(symbol, at))
            .await
        {
            Ok(Some(close)) => Some(close),
            Ok(None) => {
                debug!(symbol, at = %at, "no candle at or after instant");
                None
            }
            Err(e) => {
                warn!(symbol, at = %at, error = %e, "candle lookup failed");
                None
            }
        }
    }

    async fn hourly_window(
        &self,
        asset: &AssetDefinition,
        published_at: DateTime<Utc>,
        window: Duration,
    ) -> Option<PriceWindow> {
        let symbol = asset.lookup_symbol();
        let at_publish = self.candle_close(symbol, published_at).await?;
        let after_window = self.candle_close(symbol, published_at + window).await?;
        PriceWindow::from_prices(symbol, at_publish, after_window, Granularity::Hourly, None)
    }

    async fn daily_window(
        &self,
        asset: &AssetDefinition,
        published_at: DateTime<Utc>,
    ) -> Option<PriceWindow> {
        let ticker = asset.lookup_symbol();
        let date = published_at.date_naive();
        let bar = match self.daily.daily_close(ticker, date).await {
            Ok(Some(bar)) => bar,
            Ok(None) => {
                debug!(ticker, %date, "no daily bar");
                return None;
            }
            Err(e) => {
                warn!(ticker, %date, error = %e, "daily bar lookup failed");
                return None;
            }
        };

        PriceWindow::from_prices(
            bar.ticker,
            bar.previous_close,
            bar.close,
            Granularity::Daily,
            bar.direction,
        )
        .map(|w| w.on_trading_date(bar.trading_date))
    }
}

#[async_trait]
impl MarketData for MarketDataResolver {
    async fn price_window(
        &self,
        asset: &AssetDefinition,
        published_at: DateTime<Utc>,
        window: Duration,
    ) -> Option<PriceWindow> {
        match asset.class {
            AssetClass::Crypto => self.hourly_window(asset, published_at, window).await,
            AssetClass::Stock | AssetClass::Index => self.daily_window(asset, published_at).await,
        }
    }
}
