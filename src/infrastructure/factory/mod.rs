//! Factory functions that build configured adapters.
//!
//! # Submodules
//!
//! - [`classifier`] - Title classifier construction
//! - [`llm`] - LLM client construction
//! - [`market`] - Market-data resolver construction
//! - [`runtime`] - Composition of the application services

pub mod classifier;
pub mod llm;
pub mod market;
pub mod runtime;

pub use runtime::Runtime;
