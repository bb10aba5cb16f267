use dispatch_flow::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Telegram API error: {0}")]
    Telegram(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Model request failed: {0}")]
    Model(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Workflow(String),
}

pub type Result<T> = std::result::Result<T, BotError>;

impl From<reqwest::Error> for BotError {
    fn from(error: reqwest::Error) -> Self {
        BotError::Download(error.to_string())
    }
}

impl From<lopdf::Error> for BotError {
    fn from(error: lopdf::Error) -> Self {
        BotError::Pdf(error.to_string())
    }
}

impl From<GraphError> for BotError {
    fn from(error: GraphError) -> Self {
        match error {
            // Task failures already carry a user-facing message
            GraphError::TaskExecutionFailed(message) => BotError::Workflow(message),
            other => BotError::Workflow(other.to_string()),
        }
    }
}

impl From<BotError> for GraphError {
    fn from(error: BotError) -> Self {
        GraphError::TaskExecutionFailed(error.to_string())
    }
}
