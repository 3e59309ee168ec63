//! Title classifier strategies.
//!
//! - [`PatternClassifier`] - regex registry and keyword lexicons, offline
//! - [`LlmClassifier`] - language-model extraction mapped onto the registry
//! - [`CachedClassifier`] - memoizing decorator over either strategy

pub mod cached;
pub mod llm;
pub mod pattern;

pub use cached::CachedClassifier;
pub use llm::LlmClassifier;
pub use pattern::PatternClassifier;
