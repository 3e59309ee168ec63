//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - Driving side: the command-line interface
//! - [`outbound`] - Driven side: model clients, classifiers, market data,
//!   video source, ledger and cache

pub mod inbound;
pub mod outbound;
