//! LLM completion port for the model-backed classifier.
//!
//! Defines a generic interface for large language model completion requests.

use async_trait::async_trait;

use crate::error::Result;

/// Client for large language model text completion.
///
/// Implementations wrap specific LLM providers (OpenAI, Anthropic, etc.) and
/// handle authentication and response parsing.
///
/// # Errors
///
/// The [`complete`](Self::complete) method returns an error for API failures,
/// rate limits, or invalid responses.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Return the provider name for logging.
    fn name(&self) -> &'static str;

    /// Model identifier recorded alongside results.
    fn model(&self) -> &str;

    /// Send a completion request and return the generated text.
    ///
    /// # Arguments
    ///
    /// * `system` - Fixed instruction for the model.
    /// * `prompt` - The user turn to complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response is invalid.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}
