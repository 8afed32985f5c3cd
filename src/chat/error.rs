//! Completion provider error types.

use thiserror::Error;

/// Errors that can occur when asking a provider for a reply.
///
/// The `Display` text is what callers see in the `details` field.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// API answered 2xx but the body had no usable completion
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}
