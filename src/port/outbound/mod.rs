//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies such as the language
//! model, market-data sources, the classification cache and the ledger.

pub mod cache;
pub mod classifier;
pub mod ledger;
pub mod llm;
pub mod market;
pub mod video;
