//! OpenAI LLM client.
//!
//! Provides an implementation of the [`Llm`] trait for the OpenAI
//! Chat Completions API. Requests ask for a JSON object response.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result};
use crate::port::outbound::llm::Llm;

/// OpenAI Chat Completions API endpoint.
const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI API client.
#[derive(Debug)]
pub struct OpenAi {
    client: Client,
    api_url: String,
    api_key: String,
    /// Model identifier (e.g., "gpt-4o-mini").
    model: String,
    max_tokens: usize,
    /// Sampling temperature (0.0 to 2.0).
    temperature: f64,
}

impl OpenAi {
    /// Create a new OpenAI client with explicit configuration.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: usize,
        temperature: f64,
    ) -> Self {
        Self {
            client: Client::new(),
            api_url: API_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
            temperature,
        }
    }

    /// Create a client from the `OPENAI_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env(model: impl Into<String>, max_tokens: usize, temperature: f64) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| ConfigError::MissingField {
            field: "OPENAI_API_KEY",
        })?;
        Ok(Self::new(api_key, model, max_tokens, temperature))
    }

    fn request(&self, system: &str, prompt: &str) -> Request {
        Request {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![
                Message {
                    role: "system",
                    content: system.to_string(),
                },
                Message {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }
}

#[derive(Serialize)]
struct Request {
    model: String,
    max_tokens: usize,
    temperature: f64,
    messages: Vec<Message>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct Response {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl Llm for OpenAi {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&self.request(system, prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let response = response.json::<Response>().await?;
        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_system_and_user_turns() {
        let client = OpenAi::new("key", "gpt-4o-mini", 1024, 0.1);
        let json = serde_json::to_value(client.request("analyze", "영상 제목: \"x\"")).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["temperature"], 0.1);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "analyze");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["response_format"]["type"], "json_object");
    }

    #[test]
    fn response_takes_first_choice() {
        let json = r#"{
            "id": "chatcmpl-123",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "{\"assets\": []}"}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        }"#;
        let response: Response = serde_json::from_str(json).unwrap();
        let first = response.choices.into_iter().next().unwrap();
        assert_eq!(first.message.content.as_deref(), Some(r#"{"assets": []}"#));
    }

    #[test]
    fn null_content_is_tolerated() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let response: Response = serde_json::from_str(json).unwrap();
        assert!(response.choices[0].message.content.is_none());
    }

    #[test]
    fn malformed_response_is_rejected() {
        let result: std::result::Result<Response, _> =
            serde_json::from_str(r#"{"choices": "nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn client_reports_name_and_model() {
        let client = OpenAi::new("key", "gpt-4o-mini", 100, 0.1);
        assert_eq!(client.name(), "openai");
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn api_url_is_valid() {
        assert!(API_URL.starts_with("https://"));
        assert!(API_URL.contains("/v1/chat/completions"));
    }
}

/// Integration tests that require real API access.
/// Run with: `cargo test --features integration-tests -- --ignored`
#[cfg(all(test, feature = "integration-tests"))]
mod integration_tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    #[ignore = "requires OPENAI_API_KEY and network access"]
    async fn json_mode_completion() {
        let Ok(client) = OpenAi::from_env("gpt-4o-mini", 256, 0.1) else {
            eprintln!("Skipping OpenAI integration test: OPENAI_API_KEY not set");
            return;
        };

        let result = tokio::time::timeout(
            Duration::from_secs(30),
            client.complete(
                "Respond with a JSON object.",
                r#"Return exactly {"status": "ok"}"#,
            ),
        )
        .await
        .expect("Request timed out")
        .expect("API call failed");

        let json: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(json["status"], "ok");
    }
}
