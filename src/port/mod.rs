//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (video platform, exchanges, language models, storage).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌──────────┐           ┌─────────────┐              ┌───────────┐
//! │Classifier│           │   Market    │              │  Ledger   │
//! │ Adapter  │           │   Adapter   │              │  Adapter  │
//! └──────────┘           └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`outbound::llm::Llm`] - Language model completion
//! - [`outbound::classifier::TitleClassifier`] - Title to assets + tone
//! - [`outbound::cache::ClassificationCache`] - Memoized model results
//! - [`outbound::market`] - Candle, daily-bar and price-window sources
//! - [`outbound::video::VideoSource`] - Channel uploads
//! - [`outbound::ledger::PredictionLedger`] - Verdict persistence

pub mod outbound;
