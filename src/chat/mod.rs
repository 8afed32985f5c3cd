//! Chat endpoint logic.
//!
//! Validates the inbound message and hands it to the provider chosen at
//! startup: the completion API when a key is configured, keyword replies
//! otherwise.

mod error;
mod local;
mod provider;
mod remote;
mod types;

use std::sync::Arc;

use hyper::StatusCode;
use serde_json::Value;

pub use error::ProviderError;
pub use local::LocalProvider;
pub use provider::ReplyProvider;
pub use types::ChatBody;

use remote::RemoteProvider;

use crate::config::{ChatConfig, ChatMode};
use crate::logger;

pub const NO_MESSAGE_ERROR: &str = "No message provided";
pub const UPSTREAM_ERROR: &str = "OpenAI request failed";

/// Status and JSON body produced for one chat request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOutcome {
    pub status: StatusCode,
    pub body: ChatBody,
}

impl ChatOutcome {
    fn reply(text: String) -> Self {
        Self {
            status: StatusCode::OK,
            body: ChatBody::reply(text),
        }
    }

    fn no_message() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ChatBody::error(NO_MESSAGE_ERROR, None),
        }
    }

    fn upstream_failure(err: &ProviderError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ChatBody::error(UPSTREAM_ERROR, Some(err.to_string())),
        }
    }
}

/// Chat request handler, built once and shared by every connection
#[derive(Clone)]
pub struct ChatHandler {
    provider: Arc<dyn ReplyProvider>,
}

impl ChatHandler {
    /// Select the provider from configuration
    pub fn new(config: &ChatConfig) -> Self {
        let provider: Arc<dyn ReplyProvider> = match config.credential() {
            Some(key) => Arc::new(RemoteProvider::new(key.to_string(), config)),
            None => Arc::new(LocalProvider::default()),
        };
        Self::with_provider(provider)
    }

    pub fn with_provider(provider: Arc<dyn ReplyProvider>) -> Self {
        Self { provider }
    }

    pub fn mode(&self) -> ChatMode {
        self.provider.mode()
    }

    /// Handle one raw request body
    ///
    /// Never fails: bad input becomes a 400, provider failure a 500.
    pub async fn handle(&self, raw: &[u8]) -> ChatOutcome {
        let Some(message) = extract_message(raw) else {
            return ChatOutcome::no_message();
        };

        match self.provider.reply(&message).await {
            Ok(reply) => ChatOutcome::reply(reply),
            Err(e) => {
                logger::log_provider_failure(&e);
                ChatOutcome::upstream_failure(&e)
            }
        }
    }
}

/// Pull a trimmed, non-empty `message` out of a JSON body.
///
/// Missing or undecodable bodies count as an empty object.
fn extract_message(raw: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(raw).unwrap_or(Value::Null);
    let message = value.get("message")?.as_str()?.trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}
