use async_trait::async_trait;
use dispatch_flow::{Context, GraphError, NextAction, Result, Task, TaskResult};
use std::sync::Arc;
use tracing::info;

use crate::agents::{AgentInput, TextAgent};
use crate::models::{DispatchState, DownloadedPdf, Request, session_keys};
use crate::telegram::ChatTransport;

/// Summarizes the delivered PDF, replies with the summary and removes the file
pub struct SummarizeTask {
    agent: Arc<dyn TextAgent>,
    transport: Arc<dyn ChatTransport>,
}

impl SummarizeTask {
    pub fn new(agent: Arc<dyn TextAgent>, transport: Arc<dyn ChatTransport>) -> Self {
        Self { agent, transport }
    }
}

#[async_trait]
impl Task for SummarizeTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let request: Request = context
            .get(session_keys::REQUEST)
            .await
            .ok_or_else(|| GraphError::ContextError("request not found".to_string()))?;
        let pdf_path: String = context
            .get(session_keys::PDF_PATH)
            .await
            .ok_or_else(|| GraphError::ContextError("pdf_path not found".to_string()))?;

        context
            .set(session_keys::STATE, DispatchState::Summarizing)
            .await;
        info!(task_id = %self.id(), pdf_path = %pdf_path, "Summarizing book");

        let result = self
            .agent
            .invoke(AgentInput::new(format!("Summarize this book: {}", pdf_path)))
            .await
            .map_err(|e| GraphError::TaskExecutionFailed(e.to_string()))?;

        let reply = format!("Summary: \n\n{}", result.output);
        self.transport.send_message(request.chat_id, &reply).await?;

        if let Some(path) = context.take::<String>(session_keys::PDF_PATH).await {
            drop(DownloadedPdf::new(path));
        }
        context.set(session_keys::STATE, DispatchState::Replied).await;

        Ok(TaskResult::new_with_status(
            Some(result.output),
            NextAction::End,
            Some("Summary sent".to_string()),
        ))
    }
}
