//! Outbound adapters (driven side).

pub mod classifier;
pub mod ledger;
pub mod llm;
pub mod market;
pub mod sqlite;
pub mod youtube;
