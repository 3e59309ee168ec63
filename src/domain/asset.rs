//! Static asset registry.
//!
//! Maps human asset labels (as emitted by the classifiers) to the symbols the
//! market-data sources understand. The registry is built once at start-up and
//! shared read-only for the rest of the run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Asset class; drives which market-data source resolves the asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    /// Trades continuously; resolved from hourly exchange candles.
    Crypto,
    /// Single equity; resolved from daily bars.
    Stock,
    /// Market index; resolved from daily bars.
    Index,
}

impl AssetClass {
    /// True when the asset trades on an exchange calendar.
    #[must_use]
    pub const fn uses_daily_bars(self) -> bool {
        matches!(self, Self::Stock | Self::Index)
    }
}

/// A registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDefinition {
    /// Label used by classifiers and as part of the prediction key.
    pub label: String,
    /// Exchange symbol (e.g. `BTCUSDT`) used by the candle source.
    pub symbol: String,
    /// Daily-bar ticker (e.g. `^IXIC`, `005930.KS`).
    pub ticker: String,
    /// Display name.
    pub name: String,
    /// Market venue (`CRYPTO`, `NASDAQ`, `NYSE`, `XKRX`).
    pub venue: String,
    /// Asset class.
    pub class: AssetClass,
    /// Case-insensitive title patterns for the pattern classifier.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl AssetDefinition {
    /// Create a definition without title patterns.
    pub fn new(
        label: impl Into<String>,
        symbol: impl Into<String>,
        ticker: impl Into<String>,
        name: impl Into<String>,
        venue: impl Into<String>,
        class: AssetClass,
    ) -> Self {
        Self {
            label: label.into(),
            symbol: symbol.into(),
            ticker: ticker.into(),
            name: name.into(),
            venue: venue.into(),
            class,
            patterns: Vec::new(),
        }
    }

    /// Attach title patterns.
    #[must_use]
    pub fn with_patterns(mut self, patterns: &[&str]) -> Self {
        self.patterns = patterns.iter().map(|p| (*p).to_string()).collect();
        self
    }

    /// Symbol handed to the market-data source for this asset's class.
    #[must_use]
    pub fn lookup_symbol(&self) -> &str {
        if self.class.uses_daily_bars() {
            &self.ticker
        } else {
            &self.symbol
        }
    }
}

/// Immutable label → definition mapping.
///
/// Iteration order is registration order, which keeps classifier output
/// deterministic.
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    assets: Vec<AssetDefinition>,
    by_label: HashMap<String, usize>,
}

impl AssetRegistry {
    /// Build a registry, rejecting blank or duplicate labels.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DuplicateAsset`] or [`DomainError::EmptyAssetLabel`].
    pub fn new(assets: Vec<AssetDefinition>) -> Result<Self, DomainError> {
        let mut by_label = HashMap::with_capacity(assets.len());
        for (index, asset) in assets.iter().enumerate() {
            if asset.label.trim().is_empty() {
                return Err(DomainError::EmptyAssetLabel);
            }
            if by_label.insert(asset.label.clone(), index).is_some() {
                return Err(DomainError::DuplicateAsset {
                    label: asset.label.clone(),
                });
            }
        }
        Ok(Self { assets, by_label })
    }

    /// The built-in registry.
    #[must_use]
    pub fn builtin() -> Self {
        // Labels are unique by construction.
        let assets = builtin_assets();
        let by_label = assets
            .iter()
            .enumerate()
            .map(|(i, a)| (a.label.clone(), i))
            .collect();
        Self { assets, by_label }
    }

    /// Return a new registry with `extra` appended.
    ///
    /// # Errors
    ///
    /// Returns an error if an extra entry reuses an existing label.
    pub fn extended(&self, extra: Vec<AssetDefinition>) -> Result<Self, DomainError> {
        let mut assets = self.assets.clone();
        assets.extend(extra);
        Self::new(assets)
    }

    /// Look up an asset by label. Falls back to a case-insensitive match so
    /// model output such as `bitcoin` still resolves.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&AssetDefinition> {
        if let Some(&index) = self.by_label.get(label) {
            return self.assets.get(index);
        }
        self.assets
            .iter()
            .find(|a| a.label.eq_ignore_ascii_case(label))
    }

    /// All definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &AssetDefinition> {
        self.assets.iter()
    }

    /// Labels in registration order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.assets.iter().map(|a| a.label.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn crypto(label: &str, symbol: &str, ticker: &str, name: &str) -> AssetDefinition {
    AssetDefinition::new(label, symbol, ticker, name, "CRYPTO", AssetClass::Crypto)
}

fn index(label: &str, ticker: &str, name: &str, venue: &str) -> AssetDefinition {
    AssetDefinition::new(label, ticker, ticker, name, venue, AssetClass::Index)
}

fn stock(label: &str, ticker: &str, name: &str, venue: &str) -> AssetDefinition {
    AssetDefinition::new(label, ticker, ticker, name, venue, AssetClass::Stock)
}

fn builtin_assets() -> Vec<AssetDefinition> {
    vec![
        crypto("Bitcoin", "BTCUSDT", "BTC-USD", "비트코인").with_patterns(&[
            "비트코인",
            "btc",
            "코인",
            "암호화폐",
            "가상화폐",
            "크립토",
        ]),
        crypto("Ethereum", "ETHUSDT", "ETH-USD", "이더리움").with_patterns(&[
            "이더리움",
            "eth",
            "이더",
        ]),
        index("KOSPI", "^KS11", "코스피", "XKRX").with_patterns(&[
            "코스피",
            "kospi",
            r"한국\s*(주식|증시)",
        ]),
        index("NASDAQ", "^IXIC", "나스닥", "NASDAQ").with_patterns(&[
            "나스닥",
            "nasdaq",
            r"미국\s*(주식|증시)",
            "미장",
        ]),
        index("SP500", "^GSPC", "S&P500", "NYSE"),
        stock("Tesla", "TSLA", "테슬라", "NASDAQ").with_patterns(&["테슬라", "tesla", "tsla"]),
        stock("Samsung", "005930.KS", "삼성전자", "XKRX").with_patterns(&["삼성전자", "삼전"]),
        stock("Nvidia", "NVDA", "엔비디아", "NASDAQ").with_patterns(&["엔비디아", "nvidia", "nvda"]),
        stock("Google", "GOOGL", "구글", "NASDAQ"),
        stock("Apple", "AAPL", "애플", "NASDAQ"),
        stock("Microsoft", "MSFT", "마이크로소프트", "NASDAQ"),
        stock("Amazon", "AMZN", "아마존", "NASDAQ"),
        stock("Meta", "META", "메타", "NASDAQ"),
        stock("SKHynix", "000660.KS", "SK하이닉스", "XKRX"),
        stock("Hyundai", "005380.KS", "현대차", "XKRX"),
        stock("LGEnergy", "373220.KS", "LG에너지솔루션", "XKRX"),
        stock("SamsungBio", "207940.KS", "삼성바이오로직스", "XKRX"),
        stock("Celltrion", "068270.KS", "셀트리온", "XKRX"),
        // Sectors resolve through a representative constituent.
        stock("Shipbuilding", "009540.KS", "조선주 (HD한국조선해양)", "XKRX"),
        stock("Defense", "012450.KS", "방산주 (한화에어로스페이스)", "XKRX"),
        stock("Battery", "373220.KS", "2차전지주 (LG에너지솔루션)", "XKRX"),
        stock("Auto", "005380.KS", "자동차주 (현대차)", "XKRX"),
        stock("Bio", "207940.KS", "바이오주 (삼성바이오로직스)", "XKRX"),
        stock("Bank", "105560.KS", "은행주 (KB금융)", "XKRX"),
        stock("Construction", "000720.KS", "건설주 (현대건설)", "XKRX"),
        stock("Steel", "005490.KS", "철강주 (POSCO홀딩스)", "XKRX"),
        stock("Chemical", "051910.KS", "화학주 (LG화학)", "XKRX"),
        stock("Energy", "096770.KS", "에너지주 (SK이노베이션)", "XKRX"),
        stock("Retail", "004170.KS", "유통주 (신세계)", "XKRX"),
        stock("Telecom", "017670.KS", "통신주 (SK텔레콤)", "XKRX"),
        stock("Nuclear", "034020.KS", "원전주 (두산에너빌리티)", "XKRX"),
        stock("Semiconductor", "005930.KS", "반도체주 (삼성전자)", "XKRX"),
        stock("Internet", "035720.KS", "인터넷주 (카카오)", "XKRX"),
        stock("Game", "036570.KS", "게임주 (엔씨소프트)", "XKRX"),
        stock("Entertainment", "352820.KS", "엔터주 (하이브)", "XKRX"),
    ]
}
