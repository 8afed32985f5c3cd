// Configuration types module
// Defines all configuration-related data structures

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub site: SiteConfig,
    pub chat: ChatConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Only switches HTTP/1.1 keep-alive: `0` disables it, any other value
    /// enables it. Idle keep-alive connections are bounded by the
    /// connection timeout, `max(read_timeout, write_timeout)`.
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Static site configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    /// Directory the site assets are served from
    pub root: String,
    /// Document served for `/`
    pub index_file: String,
    /// Files never served even when under `root`, given without extension
    #[serde(skip)]
    pub protected: Vec<PathBuf>,
}

/// Chat endpoint configuration
///
/// `api_key` is redacted from `Debug` output.
#[derive(Deserialize, Clone)]
pub struct ChatConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl PerformanceConfig {
    pub const fn keep_alive_enabled(&self) -> bool {
        self.keep_alive_timeout > 0
    }
}

impl std::fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Which reply path the chat endpoint runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    /// Proxy to the completion API
    Remote,
    /// Canned keyword replies
    Local,
}

impl std::fmt::Display for ChatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Local => write!(f, "local"),
        }
    }
}

impl ChatConfig {
    /// The API key, if one is configured and not blank
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn mode(&self) -> ChatMode {
        if self.credential().is_some() {
            ChatMode::Remote
        } else {
            ChatMode::Local
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat_config(api_key: Option<&str>) -> ChatConfig {
        ChatConfig {
            api_key: api_key.map(String::from),
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: 800,
            temperature: 0.15,
        }
    }

    #[test]
    fn test_mode_follows_credential() {
        assert_eq!(chat_config(Some("sk-test")).mode(), ChatMode::Remote);
        assert_eq!(chat_config(None).mode(), ChatMode::Local);
    }

    #[test]
    fn test_blank_credential_is_absent() {
        assert_eq!(chat_config(Some("")).mode(), ChatMode::Local);
        assert_eq!(chat_config(Some("   ")).mode(), ChatMode::Local);
        assert_eq!(chat_config(Some(" sk-x ")).credential(), Some("sk-x"));
    }

    #[test]
    fn test_keep_alive_switch() {
        let mut performance = PerformanceConfig {
            keep_alive_timeout: 75,
            read_timeout: 120,
            write_timeout: 120,
            max_connections: None,
        };
        assert!(performance.keep_alive_enabled());
        performance.keep_alive_timeout = 0;
        assert!(!performance.keep_alive_enabled());
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", chat_config(Some("sk-secret")));
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
