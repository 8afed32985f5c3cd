//! HTTP protocol layer module
//!
//! Protocol helpers shared by the static file server and the chat endpoint.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    apply_common_headers, build_304_response, build_404_response, build_405_response,
    build_413_response, build_json_response, build_options_response,
};
