//! `POST /api/chat` adapter
//!
//! Reads the request body under the size limit and turns the chat outcome
//! into a JSON response.

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::Response;

use crate::config::AppState;
use crate::http;
use crate::logger;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub async fn handle_chat<B>(body: B, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let limit = usize::try_from(state.config.http.max_body_size).unwrap_or(usize::MAX);

    let raw = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!("Chat request body exceeds {limit} bytes"));
            return http::build_413_response();
        }
        Err(e) => {
            // Unreadable bodies are handled like absent ones
            logger::log_warning(&format!("Failed to read chat request body: {e}"));
            Bytes::new()
        }
    };

    let outcome = state.chat.handle(&raw).await;
    http::build_json_response(outcome.status, &outcome.body)
}
