// In-memory collaborators for exercising the chat relay without Postgres or
// a live webhook.

use crate::error::{StoreError, WebhookError};
use crate::middleware::auth::SessionVerifier;
use crate::models::auth::AuthenticatedUser;
use crate::models::chat::{ChatMessage, MessageRole, WebhookPayload};
use crate::services::message_store::{validate_append, MessageStore};
use crate::webhook_client::{WebhookResponse, WebhookTransport};
use async_trait::async_trait;
use axum::http::HeaderMap;
use std::sync::Mutex;

pub struct FixedVerifier {
    user: Option<AuthenticatedUser>,
}

impl FixedVerifier {
    pub fn new(user: Option<AuthenticatedUser>) -> Self {
        Self { user }
    }
}

impl SessionVerifier for FixedVerifier {
    fn verify(&self, _headers: &HeaderMap) -> Option<AuthenticatedUser> {
        self.user.clone()
    }
}

pub struct RecordingStore {
    messages: Mutex<Vec<ChatMessage>>,
    fail: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// Every append fails as if the pool were exhausted.
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageStore for RecordingStore {
    async fn append(
        &self,
        user_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ChatMessage, StoreError> {
        if self.fail {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        validate_append(role, content)?;

        let message = ChatMessage {
            id: uuid::Uuid::new_v4(),
            content: content.to_string(),
            role: role.as_str().to_string(),
            user_id: user_id.to_string(),
            created_at: chrono::Utc::now(),
        };
        self.messages.lock().unwrap().push(message.clone());
        Ok(message)
    }
}

/// Answers every call with the same response and records what was sent.
/// Without a response every call fails at the transport level.
pub struct ScriptedTransport {
    response: Option<WebhookResponse>,
    calls: Mutex<Vec<(String, WebhookPayload)>>,
}

impl ScriptedTransport {
    pub fn new(response: WebhookResponse) -> Self {
        Self {
            response: Some(response),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            response: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, WebhookPayload)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookTransport for ScriptedTransport {
    async fn post(&self, url: &str, payload: &WebhookPayload) -> Result<WebhookResponse, WebhookError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        match &self.response {
            Some(response) => Ok(response.clone()),
            None => {
                // An unparseable URL fails inside reqwest without touching the network.
                let err = reqwest::Client::new()
                    .post("not a url")
                    .send()
                    .await
                    .unwrap_err();
                Err(WebhookError::Request(err))
            }
        }
    }
}
