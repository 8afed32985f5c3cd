//! OpenAI-compatible completion provider.

use async_trait::async_trait;
use reqwest::Client;

use super::error::ProviderError;
use super::provider::ReplyProvider;
use super::types::{CompletionRequest, CompletionResponse, Message, Role};
use crate::config::{ChatConfig, ChatMode};

/// Persona sent as the system message of every exchange.
pub const SYSTEM_PROMPT: &str = "You are Cipher, a helpful cyberpunk-styled portfolio assistant. \
Answer user questions about the portfolio, explain concepts clearly, and give code-level guidance when relevant. \
Be concise but thorough. Use friendly tone.";

/// Provider that proxies each message to a `chat/completions` endpoint.
pub struct RemoteProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl RemoteProvider {
    pub fn new(api_key: String, config: &ChatConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    fn build_request<'a>(&'a self, message: &'a str) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: Role::System,
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: Role::User,
                    content: message,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl ReplyProvider for RemoteProvider {
    fn mode(&self) -> ChatMode {
        ChatMode::Remote
    }

    async fn reply(&self, message: &str) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(message))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, message });
        }

        let body = response.bytes().await?;
        let completion: CompletionResponse = serde_json::from_slice(&body)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        completion
            .first_content()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| ProviderError::MalformedResponse("no choices returned".to_string()))
    }
}
