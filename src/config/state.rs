// Application state module
// Read-only state shared by every connection

use std::sync::Arc;

use super::types::Config;
use crate::chat::ChatHandler;

/// Application state
pub struct AppState {
    pub config: Config,
    pub chat: ChatHandler,
}

impl AppState {
    /// Build the state once at startup, selecting the chat provider from `config`
    pub fn new(config: Config) -> Self {
        let chat = ChatHandler::new(&config.chat);
        Self::with_chat(config, chat)
    }

    /// Build the state around an already constructed chat handler
    pub fn with_chat(config: Config, chat: ChatHandler) -> Self {
        Self { config, chat }
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
