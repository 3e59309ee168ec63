//! Infrastructure configuration modules.

pub mod collection;
pub mod llm;
pub mod logging;
pub mod market;
pub mod settings;

pub use settings::Config;
