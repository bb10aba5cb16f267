use anyhow::anyhow;
use async_trait::async_trait;
use rig::{
    agent::Agent,
    client::CompletionClient,
    completion::Prompt,
    providers::ollama,
};

use crate::config::BotConfig;

/// Plain prompt-in, text-out access to a language model
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Client for the local Ollama server named in the config
pub fn ollama_client(config: &BotConfig) -> anyhow::Result<ollama::Client> {
    ollama::Client::builder()
        .base_url(&config.ollama_base_url)
        .build()
        .map_err(|e| anyhow!("Failed to create Ollama client: {}", e))
}

/// [`TextModel`] backed by Ollama, without a system preamble
pub struct OllamaModel {
    agent: Agent<ollama::CompletionModel>,
}

impl OllamaModel {
    pub fn new(config: &BotConfig) -> anyhow::Result<Self> {
        let client = ollama_client(config)?;
        let agent = client
            .agent(&config.ollama_model)
            .temperature(config.temperature)
            .build();
        Ok(Self { agent })
    }
}

#[async_trait]
impl TextModel for OllamaModel {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let response = self.agent.prompt(prompt).await?;
        Ok(response)
    }
}
