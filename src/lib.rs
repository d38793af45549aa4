// lib.rs - Library root shared by the server and the helper binaries
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;
pub mod webhook_client;

#[cfg(test)]
pub(crate) mod testing;

pub use config::AppConfig;
pub use error::ChatError;
pub use services::ChatRelay;

/// Shared state handed to every handler through an `Extension`.
pub struct AppState {
    pub db_pool: sqlx::PgPool,
    pub config: AppConfig,
    pub relay: ChatRelay,
}
