//! Groq chat-completion client
//!
//! Speaks the OpenAI-compatible chat completions protocol; the configured
//! endpoint and model decide the actual backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::{AppError, AppResult};
use crate::external::CompletionProvider;

/// LLM completion client
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    api_endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl GroqClient {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: Client::new(),
            api_endpoint: config.api_endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Client with a custom endpoint (for testing)
    pub fn with_endpoint(mut self, api_endpoint: String) -> Self {
        self.api_endpoint = api_endpoint;
        self
    }
}

#[async_trait]
impl CompletionProvider for GroqClient {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.api_endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::LlmProvider(format!("completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::LlmProvider(format!(
                "completion error: {} - {}",
                status, body
            )));
        }

        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::LlmProvider(format!("malformed completion response: {}", e)))?;

        data.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::LlmProvider("completion returned no choices".to_string()))
    }
}
