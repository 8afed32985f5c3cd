//! Reply provider trait.

use async_trait::async_trait;

use super::error::ProviderError;
use crate::config::ChatMode;

/// Something that turns a validated user message into reply text.
#[async_trait]
pub trait ReplyProvider: Send + Sync {
    /// Which chat mode this provider implements.
    fn mode(&self) -> ChatMode;

    /// Produce a reply for a non-empty, trimmed message.
    async fn reply(&self, message: &str) -> Result<String, ProviderError>;
}
