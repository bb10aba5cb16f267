use async_trait::async_trait;
use dispatch_flow::{Context, GraphError, NextAction, Result, Task, TaskResult};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::models::{Request, session_keys};
use crate::telegram::ChatTransport;

pub const DOCUMENT_CAPTION: &str = "Here's the book you requested!";

/// Sends the located PDF to the chat
pub struct DeliverDocumentTask {
    transport: Arc<dyn ChatTransport>,
}

impl DeliverDocumentTask {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl Task for DeliverDocumentTask {
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

        self.transport
            .send_document(request.chat_id, Path::new(&pdf_path), DOCUMENT_CAPTION)
            .await?;
        info!(task_id = %self.id(), pdf_path = %pdf_path, "Book delivered");

        Ok(TaskResult::new_with_status(
            None,
            NextAction::Continue,
            Some("Document sent".to_string()),
        ))
    }
}
