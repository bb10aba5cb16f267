pub mod client;
pub mod types;

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;

pub use client::TelegramClient;
pub use types::{Chat, Message, Update};

/// Outbound half of the chat transport
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a file as an attachment with a caption
    async fn send_document(&self, chat_id: i64, path: &Path, caption: &str) -> Result<()>;

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;
}

/// Inbound half of the chat transport
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Updates with an id of at least `offset`, blocking until some arrive or
    /// the poll times out
    async fn updates(&self, offset: Option<i64>) -> Result<Vec<Update>>;
}
