use async_trait::async_trait;
use dispatch_flow::{Context, GraphError, NextAction, Result, Task, TaskResult};
use std::sync::Arc;
use tracing::info;

use crate::models::{DispatchState, Request, session_keys};
use crate::telegram::ChatTransport;

pub fn not_found_message(search_output: &str, file_path: &str) -> String {
    format!(
        "Sorry, Couldn't find the book. Error: {} and received file_path: {}",
        search_output, file_path
    )
}

/// Tells the user the search came back without a usable PDF
pub struct NotFoundTask {
    transport: Arc<dyn ChatTransport>,
}

impl NotFoundTask {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl Task for NotFoundTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let request: Request = context
            .get(session_keys::REQUEST)
            .await
            .ok_or_else(|| GraphError::ContextError("request not found".to_string()))?;
        let search_output: String = context
            .get(session_keys::SEARCH_OUTPUT)
            .await
            .unwrap_or_default();
        let file_path: String = context
            .get(session_keys::FILE_PATH)
            .await
            .unwrap_or_default();

        let message = not_found_message(&search_output, &file_path);
        self.transport.send_message(request.chat_id, &message).await?;
        context.set(session_keys::STATE, DispatchState::Errored).await;
        info!(task_id = %self.id(), "Reported missing book");

        Ok(TaskResult::new_with_status(
            Some(message),
            NextAction::End,
            Some("Book not found".to_string()),
        ))
    }
}
