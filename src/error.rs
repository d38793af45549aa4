// src/error.rs
use crate::models::auth::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

/// Failures surfaced by `POST /api/chat`. Every variant maps to one of the
/// documented status codes, so nothing escapes the handler unconverted.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Message is required")]
    InvalidInput,
    #[error("Webhook error: {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("Invalid request or upstream failure: {0}")]
    Internal(String),
}

impl ChatError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ChatError::Unauthorized => StatusCode::UNAUTHORIZED,
            ChatError::InvalidInput => StatusCode::BAD_REQUEST,
            ChatError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ChatError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ChatError::Unauthorized => ErrorResponse::new("Unauthorized"),
            ChatError::InvalidInput => ErrorResponse::new("Message is required"),
            ChatError::Upstream { status, body } => {
                ErrorResponse::with_detail("Webhook error", format!("{}: {}", status, body))
            }
            ChatError::Internal(detail) => {
                ErrorResponse::with_detail("Invalid request or upstream failure", detail)
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ChatError {
    fn from(err: StoreError) -> Self {
        ChatError::Internal(err.to_string())
    }
}

impl From<WebhookError> for ChatError {
    fn from(err: WebhookError) -> Self {
        ChatError::Internal(err.to_string())
    }
}

impl From<NormalizeError> for ChatError {
    fn from(err: NormalizeError) -> Self {
        ChatError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Internal(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Refusing to store an empty {0} message")]
    EmptyContent(&'static str),
    #[error("Messages with role '{0}' are not persisted")]
    UnsupportedRole(&'static str),
}

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Webhook request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Webhook returned malformed JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: ChatError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_unauthorized_body() {
        let (status, body) = body_json(ChatError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({"error": "Unauthorized"}));
    }

    #[tokio::test]
    async fn test_invalid_input_body() {
        let (status, body) = body_json(ChatError::InvalidInput).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "Message is required"}));
    }

    #[tokio::test]
    async fn test_upstream_detail_includes_status_and_body() {
        let err = ChatError::Upstream {
            status: 500,
            body: "workflow crashed".to_string(),
        };
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            body,
            serde_json::json!({"error": "Webhook error", "detail": "500: workflow crashed"})
        );
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_internal() {
        let err: ChatError = StoreError::EmptyContent("assistant").into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Invalid request or upstream failure");
        assert_eq!(body["detail"], "Refusing to store an empty assistant message");
    }
}
