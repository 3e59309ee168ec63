//! LLM client factory.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::llm::anthropic::Anthropic;
use crate::adapter::outbound::llm::openai::OpenAi;
use crate::error::Result;
use crate::infrastructure::config::llm::{LlmConfig, LlmProvider};
use crate::port::outbound::llm::Llm;

/// Build the configured LLM client.
///
/// # Errors
///
/// Returns [`crate::error::ConfigError::MissingField`] when the provider's
/// API key is not set in the environment.
pub fn build_llm_client(config: &LlmConfig) -> Result<Arc<dyn Llm>> {
    let client: Arc<dyn Llm> = match config.provider {
        LlmProvider::Anthropic => Arc::new(Anthropic::from_env(
            &config.anthropic.model,
            config.anthropic.max_tokens,
            config.anthropic.temperature,
        )?),
        LlmProvider::OpenAi => Arc::new(OpenAi::from_env(
            &config.openai.model,
            config.openai.max_tokens,
            config.openai.temperature,
        )?),
    };

    info!(provider = client.name(), model = client.model(), "LLM client initialized");
    Ok(client)
}
