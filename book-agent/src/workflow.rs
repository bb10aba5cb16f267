use dispatch_flow::{Graph, GraphBuilder, Task};
use std::path::PathBuf;
use std::sync::Arc;

use crate::agents::{SEARCH_AGENT_PROMPT, SUMMARY_AGENT_PROMPT, TextAgent, create_agent};
use crate::config::BotConfig;
use crate::llm::TextModel;
use crate::models::session_keys;
use crate::search::SearchProvider;
use crate::tasks::{DeliverDocumentTask, NotFoundTask, SearchTask, SummarizeTask};
use crate::telegram::ChatTransport;
use crate::tools::{SearchAndDownloadTool, SummarizePdfTool};

/// The two agents every request goes through
pub struct ReplyAgents {
    pub search: Arc<dyn TextAgent>,
    pub summary: Arc<dyn TextAgent>,
}

impl ReplyAgents {
    /// One search agent and one summary agent, each with its single tool
    pub fn from_config(
        config: &BotConfig,
        provider: Arc<dyn SearchProvider>,
        model: Arc<dyn TextModel>,
    ) -> anyhow::Result<Self> {
        let search_tool = SearchAndDownloadTool::new(config, provider)?;
        let summary_tool = SummarizePdfTool::new(config, model);

        let search = create_agent(config, search_tool, SEARCH_AGENT_PROMPT)?;
        let summary = create_agent(config, summary_tool, SUMMARY_AGENT_PROMPT)?;

        Ok(Self {
            search: Arc::new(search),
            summary: Arc::new(summary),
        })
    }
}

/// search ─┬─ found ──> deliver document ──> summarize
///         └─ missing ─> not found
pub fn build_reply_workflow(
    search_agent: Arc<dyn TextAgent>,
    summary_agent: Arc<dyn TextAgent>,
    transport: Arc<dyn ChatTransport>,
    download_dir: PathBuf,
) -> Graph {
    let search = Arc::new(SearchTask::new(search_agent, download_dir));
    let deliver = Arc::new(DeliverDocumentTask::new(transport.clone()));
    let summarize = Arc::new(SummarizeTask::new(summary_agent, transport.clone()));
    let not_found = Arc::new(NotFoundTask::new(transport));

    let search_id = search.id().to_string();
    let deliver_id = deliver.id().to_string();
    let summarize_id = summarize.id().to_string();
    let not_found_id = not_found.id().to_string();

    GraphBuilder::new("book_reply")
        .add_task(search)
        .add_task(deliver)
        .add_task(summarize)
        .add_task(not_found)
        .add_conditional_edge(
            &search_id,
            |context| context.get_sync::<bool>(session_keys::FOUND).unwrap_or(false),
            &deliver_id,
            &not_found_id,
        )
        .add_edge(&deliver_id, &summarize_id)
        .build()
}
