use dispatch_flow::{Context, Graph};
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span};

use crate::error::BotError;
use crate::models::{DispatchState, DownloadRegistry, DownloadedPdf, Request, session_keys};
use crate::telegram::ChatTransport;

/// Runs the reply workflow for one message at a time. Shared by every
/// in-flight message; each run gets its own [`Context`].
pub struct Dispatcher {
    graph: Arc<Graph>,
    transport: Arc<dyn ChatTransport>,
}

impl Dispatcher {
    pub fn new(graph: Graph, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            graph: Arc::new(graph),
            transport,
        }
    }

    /// Handle one inbound message through to a terminal state. Never fails:
    /// any error is reported to the chat as `Error: <message>`.
    pub async fn handle_message(&self, request: Request) -> DispatchState {
        let span = info_span!(
            "handle_message",
            request_id = %request.request_id,
            chat_id = request.chat_id,
            message_id = request.message_id
        );
        self.dispatch(request).instrument(span).await
    }

    async fn dispatch(&self, request: Request) -> DispatchState {
        info!(text = %request.text, "Message received");
        let chat_id = request.chat_id;

        let context = Context::new();
        context.set(session_keys::REQUEST, &request).await;
        context
            .set(session_keys::STATE, DispatchState::Received)
            .await;

        let downloads = DownloadRegistry::default();
        let outcome = downloads.scope(self.graph.run(context.clone())).await;

        // Files the workflow did not clean up itself, whether the tool
        // downloaded them or the agent named them
        let _leftover = context
            .take::<String>(session_keys::PDF_PATH)
            .await
            .map(DownloadedPdf::new);
        let downloaded = downloads.release();
        debug!(files = downloaded, "Released request downloads");

        match outcome {
            Ok(report) => {
                let state = context
                    .get::<DispatchState>(session_keys::STATE)
                    .await
                    .filter(|state| state.is_terminal())
                    .unwrap_or(DispatchState::Errored);
                info!(state = %state, trail = ?report.trail, "Message handled");
                state
            }
            Err(e) => {
                let e = BotError::from(e);
                error!(error = %e, "Failed to handle message");
                let reply = format!("Error: {}", e);
                if let Err(send_error) = self.transport.send_message(chat_id, &reply).await {
                    error!(error = %send_error, "Failed to report error to chat");
                }
                DispatchState::Errored
            }
        }
    }
}
