//! Price windows produced by the market-data resolver.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::tone::MarketMove;

/// Sampling granularity of a price window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Candle closes at publish time and publish time + window.
    Hourly,
    /// Trading-day close against the previous trading-day close.
    Daily,
}

/// Prices bracketing a prediction and the move between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceWindow {
    pub ticker: String,
    pub price_at_publish: Decimal,
    pub price_after_window: Decimal,
    /// Percentage change, rounded to four decimal places.
    pub change_percent: Decimal,
    pub movement: MarketMove,
    pub granularity: Granularity,
    /// Trading day the daily bar belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trading_date: Option<NaiveDate>,
}

impl PriceWindow {
    /// Build a window from two prices.
    ///
    /// Returns `None` when the starting price is not positive. `reported` is
    /// the source's own verdict, consulted only to tell a flat day from a
    /// zero-change up day.
    #[must_use]
    pub fn from_prices(
        ticker: impl Into<String>,
        price_at_publish: Decimal,
        price_after_window: Decimal,
        granularity: Granularity,
        reported: Option<MarketMove>,
    ) -> Option<Self> {
        if price_at_publish <= Decimal::ZERO {
            return None;
        }
        let change_percent = ((price_after_window - price_at_publish) / price_at_publish
            * Decimal::ONE_HUNDRED)
            .round_dp(4);
        Some(Self {
            ticker: ticker.into(),
            price_at_publish,
            price_after_window,
            change_percent,
            movement: movement_of(change_percent, reported),
            granularity,
            trading_date: None,
        })
    }

    #[must_use]
    pub fn on_trading_date(mut self, date: NaiveDate) -> Self {
        self.trading_date = Some(date);
        self
    }
}

/// Sign of the change; zero counts as up unless the source reports flat.
fn movement_of(change: Decimal, reported: Option<MarketMove>) -> MarketMove {
    if change > Decimal::ZERO {
        MarketMove::Up
    } else if change < Decimal::ZERO {
        MarketMove::Down
    } else if reported == Some(MarketMove::Flat) {
        MarketMove::Flat
    } else {
        MarketMove::Up
    }
}
