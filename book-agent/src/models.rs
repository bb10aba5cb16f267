use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// One inbound text message to handle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub request_id: String,
    pub chat_id: i64,
    pub message_id: i64,
    pub text: String,
}

impl Request {
    pub fn new(chat_id: i64, message_id: i64, text: impl Into<String>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            chat_id,
            message_id,
            text: text.into(),
        }
    }
}

/// What the search step produced, once its text output is interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(PathBuf),
    NotFound {
        raw_output: String,
        file_path: String,
    },
}

/// Where a message is in the reply sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchState {
    Received,
    Searching,
    Found,
    NotFound,
    Summarizing,
    Replied,
    Errored,
}

impl DispatchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, DispatchState::Replied | DispatchState::Errored)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DispatchState::Received => "received",
            DispatchState::Searching => "searching",
            DispatchState::Found => "found",
            DispatchState::NotFound => "not_found",
            DispatchState::Summarizing => "summarizing",
            DispatchState::Replied => "replied",
            DispatchState::Errored => "errored",
        }
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owner of a downloaded PDF. The file is removed when the value is dropped,
/// whichever way the handling task exits.
#[derive(Debug)]
pub struct DownloadedPdf {
    path: PathBuf,
}

impl DownloadedPdf {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DownloadedPdf {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed downloaded PDF"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove downloaded PDF"),
        }
    }
}

tokio::task_local! {
    static DOWNLOADS: DownloadRegistry;
}

/// Every PDF downloaded while handling one request. The files are removed
/// on [`DownloadRegistry::release`], or when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct DownloadRegistry {
    files: Arc<Mutex<Vec<DownloadedPdf>>>,
}

impl DownloadRegistry {
    /// Run `future` with this registry collecting the downloads it makes
    pub async fn scope<F: Future>(&self, future: F) -> F::Output {
        DOWNLOADS.scope(self.clone(), future).await
    }

    /// Hand `path` to the registry of the request being handled. Returns
    /// `false` outside [`DownloadRegistry::scope`], leaving the file to the
    /// caller.
    pub fn register(path: &Path) -> bool {
        DOWNLOADS
            .try_with(|registry| registry.lock().push(DownloadedPdf::new(path)))
            .is_ok()
    }

    /// Remove every registered file, returning how many were registered
    pub fn release(&self) -> usize {
        let files = std::mem::take(&mut *self.lock());
        files.len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<DownloadedPdf>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Context keys shared by the reply workflow tasks
pub mod session_keys {
    pub const REQUEST: &str = "request";
    pub const STATE: &str = "state";
    pub const SEARCH_OUTPUT: &str = "search_output";
    pub const FOUND: &str = "found";
    pub const PDF_PATH: &str = "pdf_path";
    pub const FILE_PATH: &str = "file_path";
}
