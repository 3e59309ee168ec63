//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`]: Builders for videos, classifications and ledger records.
//! - [`llm`]: `ScriptedLlm`, a canned-response language model.
//! - [`cache`]: `MemoryCache`, an in-process classification cache.
//! - [`market`]: `FakeCandles`, `FakeDailyBars` and `FakeMarketData`.
//! - [`video`]: `FakeVideoSource`.
//! - [`ledger`]: re-export of the in-process ledger.

pub mod cache;
pub mod domain;
pub mod ledger;
pub mod llm;
pub mod market;
pub mod video;
