use reqwest::{Client, StatusCode};
use rig::{completion::ToolDefinition, tool::Tool};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::BotConfig;
use crate::error::{BotError, Result};
use crate::models::DownloadRegistry;
use crate::search::SearchProvider;

pub const PDF_NOT_FOUND: &str = "PDF not found";

/// Finds a book PDF on the web and downloads the first one that answers 200.
#[derive(Clone)]
pub struct SearchAndDownloadTool {
    provider: Arc<dyn SearchProvider>,
    client: Client,
    download_dir: PathBuf,
    max_results: usize,
}

impl SearchAndDownloadTool {
    pub fn new(config: &BotConfig, provider: Arc<dyn SearchProvider>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.download_timeout)
            .build()
            .map_err(|e| BotError::Download(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            provider,
            client,
            download_dir: config.download_dir.clone(),
            max_results: config.max_search_results,
        })
    }

    /// Returns the local path of the downloaded PDF, [`PDF_NOT_FOUND`], or
    /// `Error: <message>`. Never fails.
    pub async fn search_and_download(&self, book_title: &str) -> String {
        match self.find_pdf(book_title).await {
            Ok(Some(path)) => path.display().to_string(),
            Ok(None) => PDF_NOT_FOUND.to_string(),
            Err(e) => {
                warn!(book_title = %book_title, error = %e, "Search and download failed");
                format!("Error: {}", e)
            }
        }
    }

    async fn find_pdf(&self, book_title: &str) -> Result<Option<PathBuf>> {
        let query = format!("{} filetype:pdf", book_title);
        let hits = self.provider.text(&query, self.max_results).await?;

        for hit in hits.iter().take(self.max_results) {
            if !hit.href.ends_with(".pdf") {
                continue;
            }

            debug!(url = %hit.href, "Downloading candidate PDF");
            let response = self.client.get(&hit.href).send().await?;
            if response.status() != StatusCode::OK {
                debug!(url = %hit.href, status = %response.status(), "Candidate rejected");
                continue;
            }

            let body = response.bytes().await?;
            let path = self.persist(&body).await?;
            info!(url = %hit.href, path = %path.display(), bytes = body.len(), "Downloaded PDF");
            return Ok(Some(path));
        }

        Ok(None)
    }

    async fn persist(&self, body: &[u8]) -> Result<PathBuf> {
        let temp_path = tempfile::Builder::new()
            .prefix("book-")
            .suffix(".pdf")
            .tempfile_in(&self.download_dir)?
            .into_temp_path();

        // Dropping `temp_path` before `keep` removes the partial file
        tokio::fs::write(&temp_path, body).await?;
        let path = temp_path.keep().map_err(|e| e.error)?;
        if !DownloadRegistry::register(&path) {
            debug!(path = %path.display(), "Download kept outside a request scope");
        }
        Ok(path)
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SearchArgs {
    pub book_title: String,
}

impl Tool for SearchAndDownloadTool {
    const NAME: &'static str = "search_and_download_book";

    type Error = BotError;
    type Args = SearchArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Searches for PDF versions of books and downloads the first available one. \
                Returns the local PDF path if successful, an error message otherwise."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "book_title": {
                        "type": "string",
                        "description": "Title of the book to look for"
                    }
                },
                "required": ["book_title"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> std::result::Result<Self::Output, Self::Error> {
        Ok(self.search_and_download(&args.book_title).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DownloadedPdf;
    use crate::search::SearchHit;
    use crate::testing::StaticSearch;
    use async_trait::async_trait;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct BrokenSearch;

    #[async_trait]
    impl SearchProvider for BrokenSearch {
        async fn text(&self, _query: &str, _max_results: usize) -> Result<Vec<SearchHit>> {
            Err(BotError::Search("HTTP 429 Too Many Requests".into()))
        }
    }

    fn tool_in(dir: &tempfile::TempDir, provider: Arc<dyn SearchProvider>) -> SearchAndDownloadTool {
        let config = BotConfig {
            download_dir: dir.path().to_path_buf(),
            ..BotConfig::default()
        };
        SearchAndDownloadTool::new(&config, provider).unwrap()
    }

    #[tokio::test]
    async fn test_non_200_candidates_give_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b.pdf"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let search = StaticSearch::new(&[
            format!("{}/a.pdf", server.uri()),
            format!("{}/b.pdf", server.uri()),
        ]);
        let tool = tool_in(&dir, search.clone());

        let output = tool.search_and_download("Dune").await;
        assert_eq!(output, PDF_NOT_FOUND);
        assert_eq!(*search.queries.lock().unwrap(), vec!["Dune filetype:pdf"]);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_links_without_pdf_suffix_are_not_fetched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let search = StaticSearch::new(&[
            format!("{}/dune.html", server.uri()),
            format!("{}/dune.pdf?download=1", server.uri()),
        ]);
        let tool = tool_in(&dir, search);

        assert_eq!(tool.search_and_download("Dune").await, PDF_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_first_successful_download_wins() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/dune.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 dune".to_vec()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/later.pdf"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let search = StaticSearch::new(&[
            format!("{}/missing.pdf", server.uri()),
            format!("{}/dune.pdf", server.uri()),
            format!("{}/later.pdf", server.uri()),
        ]);
        let tool = tool_in(&dir, search);

        let output = tool.search_and_download("Dune").await;
        let downloaded = DownloadedPdf::new(&output);
        assert!(output.ends_with(".pdf"));
        assert!(downloaded.path().starts_with(dir.path()));
        assert_eq!(std::fs::read(downloaded.path()).unwrap(), b"%PDF-1.4 dune");
    }

    #[tokio::test]
    async fn test_only_first_five_results_are_examined() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sixth.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut hrefs: Vec<String> = (0..5)
            .map(|i| format!("{}/page-{}.html", server.uri(), i))
            .collect();
        hrefs.push(format!("{}/sixth.pdf", server.uri()));
        let tool = tool_in(&dir, StaticSearch::new(&hrefs));

        assert_eq!(tool.search_and_download("Dune").await, PDF_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_provider_failure_becomes_error_text() {
        let dir = tempfile::tempdir().unwrap();
        let tool = tool_in(&dir, Arc::new(BrokenSearch));

        let output = tool.search_and_download("Dune").await;
        assert_eq!(output, "Error: Search failed: HTTP 429 Too Many Requests");
    }

    #[tokio::test]
    async fn test_tool_call_uses_book_title() {
        let dir = tempfile::tempdir().unwrap();
        let search = StaticSearch::new(&[]);
        let tool = tool_in(&dir, search.clone());

        let output = tool
            .call(SearchArgs {
                book_title: "The Hobbit".into(),
            })
            .await
            .unwrap();
        assert_eq!(output, PDF_NOT_FOUND);
        assert_eq!(*search.queries.lock().unwrap(), vec!["The Hobbit filetype:pdf"]);

        let definition = tool.definition(String::new()).await;
        assert_eq!(definition.name, "search_and_download_book");
    }
}
