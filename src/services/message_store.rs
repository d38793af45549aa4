// src/services/message_store.rs
// Append-only persistence for chat messages.

use crate::error::StoreError;
use crate::models::chat::{ChatMessage, MessageRole};
use async_trait::async_trait;
use sqlx::PgPool;

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persists one message and returns the stored row.
    async fn append(
        &self,
        user_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ChatMessage, StoreError>;
}

/// Only `user` and `assistant` messages with non-empty content are stored.
pub fn validate_append(role: MessageRole, content: &str) -> Result<(), StoreError> {
    if role == MessageRole::System {
        return Err(StoreError::UnsupportedRole(role.as_str()));
    }
    if content.is_empty() {
        return Err(StoreError::EmptyContent(role.as_str()));
    }
    Ok(())
}

#[derive(Clone)]
pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn append(
        &self,
        user_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ChatMessage, StoreError> {
        validate_append(role, content)?;

        let message = sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_messages (id, content, role, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, content, role, user_id, created_at
            "#,
        )
        .bind(uuid::Uuid::new_v4())
        .bind(content)
        .bind(role.as_str())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(
            message_id = %message.id,
            user_id = %user_id,
            role = role.as_str(),
            "Stored chat message"
        );
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_content() {
        let err = validate_append(MessageRole::Assistant, "").unwrap_err();
        assert!(matches!(err, StoreError::EmptyContent("assistant")));
    }

    #[test]
    fn test_rejects_system_role() {
        let err = validate_append(MessageRole::System, "be nice").unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedRole("system")));
    }

    #[test]
    fn test_accepts_user_and_assistant() {
        assert!(validate_append(MessageRole::User, "hi").is_ok());
        assert!(validate_append(MessageRole::Assistant, "hello").is_ok());
    }
}
