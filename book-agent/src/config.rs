use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{BotError, Result};

pub const OLLAMA_MODEL: &str = "qwen2.5:7b";
pub const OLLAMA_BASE_URL: &str = "http://127.0.0.1:11434";
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_bot_token: String,
    pub telegram_api_url: String,
    /// Seconds a `getUpdates` call may be held open by Telegram
    pub poll_timeout_secs: u64,
    pub ollama_model: String,
    pub ollama_base_url: String,
    pub temperature: f64,
    pub max_search_results: usize,
    pub download_timeout: Duration,
    /// Directory downloaded PDFs are written to
    pub download_dir: PathBuf,
    /// Characters kept from each page
    pub page_char_budget: usize,
    /// Characters of the joined text sent to the model
    pub prompt_char_budget: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            telegram_bot_token: String::new(),
            telegram_api_url: TELEGRAM_API_URL.to_string(),
            poll_timeout_secs: 30,
            ollama_model: OLLAMA_MODEL.to_string(),
            ollama_base_url: OLLAMA_BASE_URL.to_string(),
            temperature: 0.7,
            max_search_results: 5,
            download_timeout: Duration::from_secs(10),
            download_dir: env::temp_dir(),
            page_char_budget: 10_000,
            prompt_char_budget: 10_000,
        }
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|e| BotError::Config(format!("TELEGRAM_BOT_TOKEN: {}", e)))?;
        Self::with_token(token)
    }

    pub fn with_token(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(BotError::Config("TELEGRAM_BOT_TOKEN is empty".to_string()));
        }
        Ok(Self {
            telegram_bot_token: token,
            ..Self::default()
        })
    }
}
