// Configuration module entry point
// Loads the process-wide configuration once at startup

mod state;
mod types;

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::StartupError;

// Re-export public types
pub use state::AppState;
pub use types::{ChatConfig, ChatMode, Config, SiteConfig};

/// Plain environment variables recognized on top of the layered sources
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub port: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl EnvOverrides {
    /// Read `PORT`, `OPENAI_API_KEY` and `OPENAI_MODEL` from the process environment
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT").ok(),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            model: std::env::var("OPENAI_MODEL").ok(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment and `config.toml`
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config", &EnvOverrides::from_env())
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Sources are layered as defaults, the optional file, `PORTFOLIO_*`
    /// variables, then the plain overrides.
    pub fn load_from(
        config_path: &str,
        overrides: &EnvOverrides,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 120)?
            .set_default("performance.write_timeout", 120)?
            .set_default("http.server_name", "portfolio-server")?
            .set_default("http.enable_cors", true)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("site.root", ".")?
            .set_default("site.index_file", "index.html")?
            .set_default("chat.model", "gpt-3.5-turbo")?
            .set_default("chat.base_url", "https://api.openai.com/v1")?
            .set_default("chat.max_tokens", 800)?
            .set_default("chat.temperature", 0.15)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("PORTFOLIO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("server.port", overrides.port.clone())?
            .set_override_option("chat.api_key", overrides.api_key.clone())?
            .set_override_option("chat.model", overrides.model.clone())?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;
        // The file may hold the API key, so the static site never serves it
        cfg.site.protected.push(PathBuf::from(config_path));
        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| StartupError::InvalidAddress { addr, source })
    }
}
