//! Echo service: returns the character-wise reversal of posted text

use crate::{
    client::ReverseResponse,
    error::{AppError, Result},
};
use axum::{body::Bytes, routing, Json, Router};
use std::future::Future;
use tokio::net::TcpListener;

/// Reverse `s` by Unicode scalar value
pub fn reverse_text(s: &str) -> String {
    s.chars().rev().collect()
}

/// Pull `text` out of a request body.
///
/// The body is read as JSON regardless of its content type; anything that
/// is not an object with a string `text` field counts as empty text.
pub fn extract_text(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("text")?.as_str().map(str::to_owned))
        .unwrap_or_default()
}

pub fn router() -> Router {
    Router::new()
        .route("/reverse", routing::post(reverse))
        .route("/health", routing::get(health))
}

async fn reverse(body: Bytes) -> Json<ReverseResponse> {
    let text = extract_text(&body);
    Json(ReverseResponse {
        reversed: reverse_text(&text),
    })
}

async fn health() -> &'static str {
    "OK"
}

/// Serve the echo routes on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::io(format!("Echo service failed: {}", e)))
}
