use async_trait::async_trait;
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use super::types::{ApiResponse, Update};
use super::{ChatTransport, UpdateSource};
use crate::config::BotConfig;
use crate::error::{BotError, Result};

/// Longest text Telegram accepts in one message
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Slack on top of the long-poll timeout before the HTTP call gives up
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Minimal Telegram Bot API client over reqwest
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    poll_timeout_secs: u64,
}

impl TelegramClient {
    pub fn new(config: &BotConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs) + POLL_GRACE)
            .build()
            .map_err(|e| BotError::Telegram(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/bot{}",
                config.telegram_api_url.trim_end_matches('/'),
                config.telegram_bot_token
            ),
            poll_timeout_secs: config.poll_timeout_secs,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    /// Long-poll for updates newer than `offset`
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        let mut body = json!({
            "timeout": self.poll_timeout_secs,
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }
        self.post_json("getUpdates", &body).await
    }

    async fn post_json<T: DeserializeOwned>(&self, method: &str, body: &Value) -> Result<T> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| BotError::Telegram(format!("{} request failed: {}", method, e)))?;

        Self::decode(method, response).await
    }

    async fn decode<T: DeserializeOwned>(method: &str, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            BotError::Telegram(format!("{} returned an unreadable response ({}): {}", method, status, e))
        })?;

        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                description,
                error_code,
                ..
            } => Err(BotError::Telegram(format!(
                "{} failed ({}): {}",
                method,
                error_code.map_or_else(|| status.as_u16().to_string(), |c| c.to_string()),
                description.unwrap_or_else(|| "no description".to_string())
            ))),
        }
    }
}

#[async_trait]
impl UpdateSource for TelegramClient {
    async fn updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        self.get_updates(offset).await
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_document(&self, chat_id: i64, path: &Path, caption: &str) -> Result<()> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "book.pdf".to_string());
        let size = bytes.len();

        let document = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")
            .map_err(|e| BotError::Telegram(e.to_string()))?;
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("document", document);

        let response = self
            .client
            .post(self.method_url("sendDocument"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| BotError::Telegram(format!("sendDocument request failed: {}", e)))?;
        let _: Value = Self::decode("sendDocument", response).await?;

        info!(chat_id = chat_id, bytes = size, "Document sent");
        Ok(())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        for chunk in split_message(text, MAX_MESSAGE_CHARS) {
            let body = json!({ "chat_id": chat_id, "text": chunk });
            let _: Value = self.post_json("sendMessage", &body).await?;
        }
        debug!(chat_id = chat_id, length = text.len(), "Message sent");
        Ok(())
    }
}

/// Split `text` into pieces of at most `limit` characters, preferring to
/// break after a newline.
pub fn split_message(text: &str, limit: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.chars().count() > limit {
        let hard_end = rest
            .char_indices()
            .nth(limit)
            .map_or(rest.len(), |(i, _)| i);
        let end = rest[..hard_end]
            .rfind('\n')
            .filter(|&i| i > 0)
            .map_or(hard_end, |i| i + 1);
        chunks.push(&rest[..end]);
        rest = &rest[end..];
    }

    if !rest.is_empty() || chunks.is_empty() {
        chunks.push(rest);
    }
    chunks
}
