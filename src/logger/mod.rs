//! Logger module
//!
//! Thin facade over `tracing` so call sites stay uniform:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use crate::chat::ProviderError;
use crate::config::{ChatMode, Config};
use crate::error::StartupError;

/// Initialize the global subscriber
///
/// `RUST_LOG` wins over `logging.level` when set. Should be called once at
/// application startup.
pub fn init(config: &Config) -> Result<(), StartupError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .map_err(|e| StartupError::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| StartupError::Logging(e.to_string()))
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("Portfolio server listening on http://{addr}");
    tracing::info!(
        root = %config.site.root,
        index = %config.site.index_file,
        "Serving static site"
    );
    match config.server.workers {
        Some(workers) => tracing::info!("Worker threads: {workers}"),
        None => tracing::info!("Worker threads: default (CPU cores)"),
    }
    tracing::info!(
        max_body_size = config.http.max_body_size,
        cors = config.http.enable_cors,
        "HTTP settings"
    );
}

/// Log which provider the chat endpoint uses. Never logs the key itself.
pub fn log_chat_mode(mode: ChatMode, model: &str) {
    match mode {
        ChatMode::Remote => tracing::info!(%mode, model, "Chat endpoint proxies to completion API"),
        ChatMode::Local => {
            tracing::info!(%mode, "No API key configured, chat endpoint uses local replies");
        }
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

pub fn log_provider_failure(err: &ProviderError) {
    tracing::warn!(error = %err, "Completion request failed");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}

pub fn log_shutdown() {
    tracing::info!("Shutdown signal received, no longer accepting connections");
}
