//! Domain validation errors for core domain types.
//!
//! This module defines errors that occur when domain invariants are violated.
//! These errors are returned by constructors that validate inputs.
//!
//! # Examples
//!
//! Handling validation errors:
//!
//! ```
//! use honeylab::domain::error::DomainError;
//! use honeylab::domain::{AssetClass, AssetDefinition, AssetRegistry};
//!
//! let btc = AssetDefinition::new("Bitcoin", "BTCUSDT", "BTC-USD", "비트코인", "CRYPTO", AssetClass::Crypto);
//! let result = AssetRegistry::new(vec![btc.clone(), btc]);
//!
//! assert!(matches!(result, Err(DomainError::DuplicateAsset { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Asset labels must be unique within a registry.
    #[error("duplicate asset label: {label}")]
    DuplicateAsset {
        /// The label that appeared more than once.
        label: String,
    },

    /// Asset labels must not be blank.
    #[error("asset label cannot be empty")]
    EmptyAssetLabel,

    /// Asset patterns must be valid regular expressions.
    #[error("invalid pattern for asset {label}: {reason}")]
    InvalidPattern {
        /// The asset whose pattern failed to compile.
        label: String,
        /// The compiler's message.
        reason: String,
    },
}
