// src/handlers/chat.rs
use crate::error::ChatError;
use crate::models::chat::ChatResponse;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::Extension,
    http::HeaderMap,
    response::Json,
    routing::post,
    Router,
};
use std::sync::Arc;

pub fn chat_routes() -> Router {
    Router::new().route("/api/chat", post(chat))
}

/// Takes the raw body so that malformed JSON is reported like any other
/// internal failure instead of as an extractor rejection.
async fn chat(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ChatResponse>, ChatError> {
    match state.relay.handle(&headers, &body).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            match &e {
                ChatError::Internal(detail) => tracing::error!("Chat API error: {}", detail),
                ChatError::Upstream { status, .. } => {
                    tracing::warn!("Webhook returned status {}", status)
                }
                _ => tracing::debug!("Rejected chat request: {}", e),
            }
            Err(e)
        }
    }
}
