use rig::{completion::ToolDefinition, tool::Tool};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::BotConfig;
use crate::error::{BotError, Result};
use crate::llm::TextModel;

pub const SUMMARY_FAILED_PREFIX: &str = "Summarization failed : ";

/// Extracts a PDF's text and asks the model for a five paragraph summary.
#[derive(Clone)]
pub struct SummarizePdfTool {
    model: Arc<dyn TextModel>,
    page_char_budget: usize,
    prompt_char_budget: usize,
}

impl SummarizePdfTool {
    pub fn new(config: &BotConfig, model: Arc<dyn TextModel>) -> Self {
        Self {
            model,
            page_char_budget: config.page_char_budget,
            prompt_char_budget: config.prompt_char_budget,
        }
    }

    /// Returns the model's summary, or `Summarization failed : <message>`.
    /// Never fails.
    pub async fn summarize_pdf(&self, pdf_path: &str) -> String {
        match self.summarize(Path::new(pdf_path)).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(pdf_path = %pdf_path, error = %e, "Summarization failed");
                format!("{}{}", SUMMARY_FAILED_PREFIX, e)
            }
        }
    }

    async fn summarize(&self, pdf_path: &Path) -> Result<String> {
        let pages = extract_pages(pdf_path).await?;
        let text = join_pages(&pages, self.page_char_budget);
        info!(
            pdf_path = %pdf_path.display(),
            pages = pages.len(),
            characters = text.chars().count(),
            "Extracted PDF text"
        );

        let prompt = build_prompt(&text, self.prompt_char_budget);
        self.model
            .complete(&prompt)
            .await
            .map_err(|e| BotError::Model(e.to_string()))
    }
}

/// Text of every page, in page order
pub async fn extract_pages(pdf_path: &Path) -> Result<Vec<String>> {
    let path: PathBuf = pdf_path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<Vec<String>> {
        let document = lopdf::Document::load(&path)?;
        let mut pages = Vec::new();
        for page_number in document.get_pages().into_keys() {
            pages.push(document.extract_text(&[page_number])?);
        }
        Ok(pages)
    })
    .await
    .map_err(|e| BotError::Pdf(format!("Extraction task failed: {}", e)))?
}

/// The first `budget` characters of `text`
pub fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Concatenate pages, keeping at most `page_budget` characters of each
pub fn join_pages(pages: &[String], page_budget: usize) -> String {
    pages
        .iter()
        .map(|page| truncate_chars(page, page_budget))
        .collect()
}

pub fn build_prompt(text: &str, budget: usize) -> String {
    format!(
        "Summarize this book content in 5 paragraphs: {}",
        truncate_chars(text, budget)
    )
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SummarizeArgs {
    pub pdf_path: String,
}

impl Tool for SummarizePdfTool {
    const NAME: &'static str = "summarize_pdf";

    type Error = BotError;
    type Args = SummarizeArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Summarizes the content of a PDF file using the local LLM".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "pdf_path": {
                        "type": "string",
                        "description": "Local path of the PDF file"
                    }
                },
                "required": ["pdf_path"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> std::result::Result<Self::Output, Self::Error> {
        Ok(self.summarize_pdf(&args.pdf_path).await)
    }
}
