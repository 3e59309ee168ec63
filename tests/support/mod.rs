//! Shared wiring for integration tests.

use std::path::Path;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use honeylab::adapter::outbound::classifier::PatternClassifier;
use honeylab::adapter::outbound::ledger::JsonLedger;
use honeylab::adapter::outbound::market::MarketDataResolver;
use honeylab::application::{
    CollectOptions, CollectionPipeline, PredictionResolver, RecoveryPass, UnknownAssetPolicy,
};
use honeylab::domain::{AssetRegistry, Video};
use honeylab::port::outbound::market::DailyClose;
use honeylab::testkit::market::{FakeCandles, FakeDailyBars};
use honeylab::testkit::video::FakeVideoSource;
use rust_decimal::Decimal;

pub fn registry() -> Arc<AssetRegistry> {
    Arc::new(AssetRegistry::builtin())
}

pub fn resolver(candles: FakeCandles, daily: FakeDailyBars) -> Arc<PredictionResolver> {
    let market = MarketDataResolver::new(
        Arc::new(candles),
        Arc::new(daily),
        std::time::Duration::ZERO,
    );
    Arc::new(PredictionResolver::new(
        Arc::new(market),
        registry(),
        Duration::hours(24),
    ))
}

pub fn pipeline(
    videos: Vec<Video>,
    resolver: Arc<PredictionResolver>,
    ledger: Arc<JsonLedger>,
) -> CollectionPipeline {
    let registry = registry();
    let classifier = PatternClassifier::new(&registry).expect("builtin patterns compile");
    CollectionPipeline::new(
        Arc::new(FakeVideoSource::new(videos)),
        Arc::new(classifier),
        registry,
        resolver,
        ledger,
        CollectOptions {
            days: 30,
            unknown_assets: UnknownAssetPolicy::Record,
            recent_limit: 20,
        },
    )
}

pub fn recovery(resolver: Arc<PredictionResolver>, ledger: Arc<JsonLedger>) -> RecoveryPass {
    RecoveryPass::new(resolver, ledger)
}

pub fn ledger(root: &Path) -> Arc<JsonLedger> {
    Arc::new(JsonLedger::new(root))
}

pub fn daily_bar(ticker: &str, date: NaiveDate, previous: Decimal, close: Decimal) -> DailyClose {
    DailyClose {
        ticker: ticker.to_string(),
        close,
        previous_close: previous,
        trading_date: date,
        direction: None,
    }
}
