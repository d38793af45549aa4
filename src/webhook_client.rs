// src/webhook_client.rs
use crate::error::WebhookError;
use crate::models::chat::WebhookPayload;
use async_trait::async_trait;
use reqwest::{header, Client};

/// Prefer JSON, accept plain text, take anything.
pub const WEBHOOK_ACCEPT: &str = "application/json, text/plain;q=0.8, */*;q=0.5";

/// Raw answer from the webhook; interpretation is left to the reply normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookResponse {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

impl WebhookResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// Single POST, no retry. Non-2xx statuses are returned, not raised.
    async fn post(&self, url: &str, payload: &WebhookPayload) -> Result<WebhookResponse, WebhookError>;
}

#[derive(Debug, Clone, Default)]
pub struct WebhookClient {
    client: Client,
}

impl WebhookClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl WebhookTransport for WebhookClient {
    async fn post(&self, url: &str, payload: &WebhookPayload) -> Result<WebhookResponse, WebhookError> {
        tracing::debug!(url = %url, "Calling automation webhook");

        let response = self
            .client
            .post(url)
            .header(header::ACCEPT, WEBHOOK_ACCEPT)
            .header(header::CACHE_CONTROL, "no-store")
            .json(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await?;

        tracing::info!(status, content_type = %content_type, "Webhook responded");

        Ok(WebhookResponse {
            status,
            content_type,
            body,
        })
    }
}
