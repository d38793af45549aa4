// src/services/mod.rs
pub mod chat_relay;
pub mod message_store;
pub mod reply_normalizer;

pub use chat_relay::ChatRelay;
pub use message_store::{MessageStore, PgMessageStore};
