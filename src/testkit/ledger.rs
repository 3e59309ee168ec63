//! In-process ledger for tests.

pub use crate::adapter::outbound::ledger::MemoryLedger;
