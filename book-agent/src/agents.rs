//! Model-backed agents that each wrap exactly one tool.
//!
//! An agent is built once at startup: a fresh Ollama client, the fixed system
//! instruction and a single tool. Handlers share it through an `Arc`; a rig
//! [`Agent`] holds no per-request state, so concurrent invocations are
//! independent.

use async_trait::async_trait;
use rig::{
    agent::Agent,
    client::CompletionClient,
    completion::Prompt,
    providers::ollama,
    tool::Tool,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BotConfig;
use crate::llm::ollama_client;

pub const SEARCH_AGENT_PROMPT: &str = "You are a book search specialist. \
ALWAYS use the search tool and return ONLY the raw file path string. \
NEVER add any additional text or formatting.";

pub const SUMMARY_AGENT_PROMPT: &str =
    "You are a book summarization expert. Always use the summary tool.";

/// Tool call plus the final answer
const MAX_TOOL_TURNS: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInput {
    pub input: String,
}

impl AgentInput {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentOutput {
    pub output: String,
}

/// Single text input, single text output
#[async_trait]
pub trait TextAgent: Send + Sync {
    async fn invoke(&self, input: AgentInput) -> anyhow::Result<AgentOutput>;
}

/// An Ollama agent bound to one tool
pub struct ToolAgent {
    name: String,
    agent: Agent<ollama::CompletionModel>,
}

#[async_trait]
impl TextAgent for ToolAgent {
    async fn invoke(&self, input: AgentInput) -> anyhow::Result<AgentOutput> {
        debug!(agent = %self.name, input = %input.input, "Invoking agent");
        let output = self
            .agent
            .prompt(input.input.as_str())
            .multi_turn(MAX_TOOL_TURNS)
            .await?;
        debug!(agent = %self.name, output_length = output.len(), "Agent finished");
        Ok(AgentOutput { output })
    }
}

/// Bind `tool` and `system_message` to a freshly configured model client
pub fn create_agent<T>(config: &BotConfig, tool: T, system_message: &str) -> anyhow::Result<ToolAgent>
where
    T: Tool + 'static,
{
    let client = ollama_client(config)?;
    let agent = client
        .agent(&config.ollama_model)
        .preamble(system_message)
        .temperature(config.temperature)
        .tool(tool)
        .build();

    Ok(ToolAgent {
        name: T::NAME.to_string(),
        agent,
    })
}
