//! Composition root.
//!
//! [`Runtime`] owns the shared pieces every command needs (registry, ledger,
//! resolver) and builds the heavier ones on demand, so `stats` never needs a
//! YouTube key and `classify --strategy pattern` never opens the database.

use std::sync::Arc;

use tracing::info;

use super::classifier::build_classifier;
use super::market::build_market_data;
use crate::adapter::outbound::ledger::JsonLedger;
use crate::adapter::outbound::youtube::YouTubeVideos;
use crate::application::{CollectOptions, CollectionPipeline, PredictionResolver, RecoveryPass};
use crate::domain::AssetRegistry;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::collection::Strategy;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::classifier::TitleClassifier;
use crate::port::outbound::ledger::PredictionLedger;
use crate::port::outbound::market::MarketData;
use crate::port::outbound::video::VideoSource;

/// Environment variable holding the YouTube Data API key.
pub const YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";

pub struct Runtime {
    config: Config,
    registry: Arc<AssetRegistry>,
    ledger: Arc<JsonLedger>,
}

impl Runtime {
    /// Wire the registry and ledger from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured assets do not form a valid registry.
    pub fn new(config: Config) -> Result<Self> {
        let registry = Arc::new(config.registry()?);
        let ledger = Arc::new(JsonLedger::new(config.data_dir.clone()));
        info!(
            assets = registry.len(),
            data_dir = %config.data_dir.display(),
            "Runtime initialized"
        );
        Ok(Self {
            config,
            registry,
            ledger,
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<AssetRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn json_ledger(&self) -> &JsonLedger {
        &self.ledger
    }

    #[must_use]
    pub fn ledger(&self) -> Arc<dyn PredictionLedger> {
        self.ledger.clone()
    }

    /// Resolver over the live market-data sources.
    #[must_use]
    pub fn resolver(&self) -> Arc<PredictionResolver> {
        self.resolver_with(build_market_data(&self.config.market))
    }

    /// Resolver over an arbitrary market-data source.
    #[must_use]
    pub fn resolver_with(&self, market: Arc<dyn MarketData>) -> Arc<PredictionResolver> {
        Arc::new(PredictionResolver::new(
            market,
            Arc::clone(&self.registry),
            self.config.resolution.window(),
        ))
    }

    /// Classifier for `strategy`, or the configured one.
    ///
    /// # Errors
    ///
    /// See [`build_classifier`].
    pub fn classifier(&self, strategy: Option<Strategy>) -> Result<Arc<dyn TitleClassifier>> {
        build_classifier(
            strategy.unwrap_or(self.config.collection.strategy),
            &self.registry,
            &self.config.llm,
            &self.config.database,
        )
    }

    /// YouTube uploads source for the configured channel.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] if `YOUTUBE_API_KEY` is unset.
    pub fn video_source(&self) -> Result<Arc<dyn VideoSource>> {
        let api_key = std::env::var(YOUTUBE_API_KEY)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingField {
                field: YOUTUBE_API_KEY,
            })?;
        Ok(Arc::new(YouTubeVideos::new(
            api_key,
            &self.config.collection.channel_id,
        )))
    }

    /// Collection pipeline over the live sources.
    ///
    /// # Errors
    ///
    /// Returns an error if the video source or classifier cannot be built.
    pub fn collection(
        &self,
        days: Option<u32>,
        strategy: Option<Strategy>,
    ) -> Result<CollectionPipeline> {
        let options = CollectOptions {
            days: days.unwrap_or(self.config.collection.days),
            unknown_assets: self.config.collection.unknown_assets,
            recent_limit: self.config.collection.recent_limit,
        };
        Ok(CollectionPipeline::new(
            self.video_source()?,
            self.classifier(strategy)?,
            Arc::clone(&self.registry),
            self.resolver(),
            self.ledger(),
            options,
        ))
    }

    /// Recovery pass over the live market-data sources.
    #[must_use]
    pub fn recovery(&self) -> RecoveryPass {
        RecoveryPass::new(self.resolver(), self.ledger())
    }
}
