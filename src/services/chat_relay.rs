// src/services/chat_relay.rs
// Request-scoped flow behind POST /api/chat: verify the caller, store the
// user message, call the webhook, normalize its answer, store the reply.

use crate::error::ChatError;
use crate::middleware::auth::SessionVerifier;
use crate::models::chat::{ChatRequest, ChatResponse, MessageCandidate, MessageRole, WebhookPayload};
use crate::services::message_store::MessageStore;
use crate::services::reply_normalizer::{normalize_reply, NormalizeDiagnostic};
use crate::webhook_client::WebhookTransport;
use axum::http::HeaderMap;
use serde_json::Value;
use std::sync::Arc;

pub struct ChatRelay {
    verifier: Arc<dyn SessionVerifier>,
    store: Arc<dyn MessageStore>,
    transport: Arc<dyn WebhookTransport>,
    webhook_url: String,
}

impl ChatRelay {
    pub fn new(
        verifier: Arc<dyn SessionVerifier>,
        store: Arc<dyn MessageStore>,
        transport: Arc<dyn WebhookTransport>,
        webhook_url: impl Into<String>,
    ) -> Self {
        Self {
            verifier,
            store,
            transport,
            webhook_url: webhook_url.into(),
        }
    }

    /// Runs one chat exchange.
    ///
    /// The user message is stored before the webhook is called and is not
    /// removed if anything afterwards fails.
    pub async fn handle(&self, headers: &HeaderMap, body: &[u8]) -> Result<ChatResponse, ChatError> {
        let user = self.verifier.verify(headers).ok_or(ChatError::Unauthorized)?;

        let request = parse_chat_request(body)?;
        let message = match request.candidate() {
            MessageCandidate::Text(text) if !text.trim().is_empty() => text.to_string(),
            MessageCandidate::NotText(value) => {
                return Err(ChatError::Internal(format!(
                    "Message must be a string, got {}",
                    value
                )))
            }
            _ => return Err(ChatError::InvalidInput),
        };

        self.store
            .append(&user.user_id, MessageRole::User, &message)
            .await?;

        tracing::info!(user_id = %user.user_id, "Forwarding chat message to webhook");
        let payload = WebhookPayload {
            message,
            user_email: user.email.clone(),
        };
        let response = self.transport.post(&self.webhook_url, &payload).await?;

        if !response.is_success() {
            return Err(ChatError::Upstream {
                status: response.status,
                body: response.body,
            });
        }

        let normalized = normalize_reply(&response.content_type, &response.body)?;
        if let Some(NormalizeDiagnostic::ReplyNotJson { error, .. }) = &normalized.diagnostic {
            tracing::warn!(user_id = %user.user_id, error = %error, "Using raw webhook reply string");
        }

        self.store
            .append(&user.user_id, MessageRole::Assistant, &normalized.text)
            .await?;

        Ok(ChatResponse {
            reply: normalized.text,
        })
    }
}

/// Decodes the inbound body. Valid JSON that isn't an object carries no
/// message fields and yields no candidate.
pub fn parse_chat_request(body: &[u8]) -> Result<ChatRequest, ChatError> {
    let value: Value = serde_json::from_slice(body)?;
    Ok(ChatRequest::from_value(value))
}
