// src/models/chat.rs
use crate::utils::is_truthy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Author of a chat message. `System` exists for transcripts rendered by
/// clients but is never written to `chat_messages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        }
    }

    pub fn parse(role: &str) -> Option<Self> {
        match role {
            "user" => Some(MessageRole::User),
            "assistant" => Some(MessageRole::Assistant),
            "system" => Some(MessageRole::System),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    pub id: uuid::Uuid,
    pub content: String,
    pub role: String,
    pub user_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ChatMessage {
    pub fn role(&self) -> Option<MessageRole> {
        MessageRole::parse(&self.role)
    }
}

/// Aliases accepted for the message text, in priority order.
pub const MESSAGE_FIELDS: [&str; 5] = ["message", "text", "prompt", "input", "query"];

/// Inbound body of `POST /api/chat`. Clients use different names for the
/// message field, so the decoded JSON is kept and searched lazily: aliases
/// that are never picked may hold any value.
#[derive(Debug, Default)]
pub struct ChatRequest {
    body: Value,
}

/// The alias that won, if any.
#[derive(Debug, PartialEq)]
pub enum MessageCandidate<'a> {
    Text(&'a str),
    /// A truthy value that is not a string.
    NotText(&'a Value),
    Missing,
}

impl ChatRequest {
    pub fn from_value(body: Value) -> Self {
        Self { body }
    }

    /// First truthy alias in `MESSAGE_FIELDS` order. Null, `false`, `0` and
    /// `""` fall through to the next alias.
    pub fn candidate(&self) -> MessageCandidate<'_> {
        let winner = MESSAGE_FIELDS
            .iter()
            .filter_map(|field| self.body.get(*field))
            .find(|value| is_truthy(value));

        match winner {
            Some(Value::String(text)) => MessageCandidate::Text(text),
            Some(other) => MessageCandidate::NotText(other),
            None => MessageCandidate::Missing,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub reply: String,
}

/// Body forwarded to the automation webhook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookPayload {
    pub message: String,
    #[serde(rename = "userEmail")]
    pub user_email: String,
}
