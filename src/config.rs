// src/config.rs
use crate::error::ConfigError;
use std::net::SocketAddr;

/// Webhook used when `N8N_WEBHOOK_URL` is unset or empty.
pub const DEFAULT_WEBHOOK_URL: &str =
    "https://neverbend007.app.n8n.cloud/webhook/7365a5cd-d9f3-4050-9c27-ec382d77b6e6";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SESSION_COOKIE: &str = "chat_session";

/// Settings resolved once at startup and shared with the request handlers.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub webhook_url: String,
    pub webhook_overridden: bool,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub session_cookie_name: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to
    /// touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = non_empty(lookup("DATABASE_URL")).ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = non_empty(lookup("JWT_SECRET")).ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let webhook_override = lookup("N8N_WEBHOOK_URL");
        let webhook_overridden = non_empty(webhook_override.clone()).is_some();
        let webhook_url = resolve_webhook_url(webhook_override.as_deref());

        let bind_addr = non_empty(lookup("BIND_ADDR"))
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let db_max_connections = match non_empty(lookup("DB_MAX_CONNECTIONS")) {
            Some(raw) => raw.parse::<u32>().map_err(|e| ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let session_cookie_name = non_empty(lookup("SESSION_COOKIE_NAME"))
            .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string());

        Ok(AppConfig {
            database_url,
            jwt_secret,
            webhook_url,
            webhook_overridden,
            bind_addr,
            db_max_connections,
            session_cookie_name,
        })
    }
}

/// Returns the override when it is set and non-empty, otherwise the default endpoint.
pub fn resolve_webhook_url(override_url: Option<&str>) -> String {
    match override_url.map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => DEFAULT_WEBHOOK_URL.to_string(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
