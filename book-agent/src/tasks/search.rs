use async_trait::async_trait;
use dispatch_flow::{Context, GraphError, NextAction, Result, Task, TaskResult};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::agents::{AgentInput, TextAgent};
use crate::models::{DispatchState, Request, SearchOutcome, session_keys};
use crate::resolve::resolve_search_output;

/// Asks the search agent for the book and decides whether a PDF was found
pub struct SearchTask {
    agent: Arc<dyn TextAgent>,
    download_dir: PathBuf,
}

impl SearchTask {
    pub fn new(agent: Arc<dyn TextAgent>, download_dir: PathBuf) -> Self {
        Self {
            agent,
            download_dir,
        }
    }
}

#[async_trait]
impl Task for SearchTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let request: Request = context
            .get(session_keys::REQUEST)
            .await
            .ok_or_else(|| GraphError::ContextError("request not found".to_string()))?;

        context
            .set(session_keys::STATE, DispatchState::Searching)
            .await;
        info!(task_id = %self.id(), title = %request.text, "Searching for book");

        let result = self
            .agent
            .invoke(AgentInput::new(request.text.as_str()))
            .await
            .map_err(|e| GraphError::TaskExecutionFailed(e.to_string()))?;
        context
            .set(session_keys::SEARCH_OUTPUT, result.output.as_str())
            .await;

        let status_message = match resolve_search_output(&result.output, &self.download_dir) {
            SearchOutcome::Found(path) => {
                info!(path = %path.display(), "PDF located");
                context.set(session_keys::FOUND, true).await;
                context
                    .set(session_keys::PDF_PATH, path.display().to_string())
                    .await;
                context.set(session_keys::STATE, DispatchState::Found).await;
                format!("PDF located at {}", path.display())
            }
            SearchOutcome::NotFound { file_path, .. } => {
                info!(file_path = %file_path, "No usable PDF in search output");
                context.set(session_keys::FOUND, false).await;
                context.set(session_keys::FILE_PATH, file_path).await;
                context
                    .set(session_keys::STATE, DispatchState::NotFound)
                    .await;
                "No PDF found".to_string()
            }
        };

        Ok(TaskResult::new_with_status(
            None,
            NextAction::Continue,
            Some(status_message),
        ))
    }
}
