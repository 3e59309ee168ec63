//! Honeylab - contrarian scoring of market calls made in video titles.
//!
//! Titles from a tracked YouTube channel are classified into (asset, tone)
//! predictions. Once the resolution window has passed, each prediction is
//! compared with the real market move; a prediction whose market went the
//! other way is "honey". The honey index is the share of resolved
//! predictions that were honey.
//!
//! # Architecture
//!
//! - **`domain`** - Pure value types: videos, assets, tone, predictions, stats
//! - **`port`** - Traits at every I/O seam
//! - **`adapter`** - Implementations: LLM clients, classifiers, market data,
//!   YouTube, the JSON ledger, the SQLite classification cache, and the CLI
//! - **`application`** - Collection run, resolver, recovery pass, aggregation
//! - **`infrastructure`** - Configuration and wiring
//!
//! # Features
//!
//! - `testkit` - Export in-memory fakes of every port for integration tests
//! - `integration-tests` - Enable tests that hit live APIs
//!
//! # Example
//!
//! ```no_run
//! use honeylab::application::aggregate;
//!
//! let stats = aggregate(&[]);
//! assert_eq!(stats.overall_index, 0.0);
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
