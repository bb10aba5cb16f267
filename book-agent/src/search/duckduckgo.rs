use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{SearchHit, SearchProvider};
use crate::error::{BotError, Result};

const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// DuckDuckGo search through its HTML endpoint, which needs no API key
#[derive(Debug, Clone)]
pub struct DuckDuckGo {
    client: Client,
    endpoint: String,
}

impl DuckDuckGo {
    pub fn new() -> Result<Self> {
        Self::with_endpoint(DDG_HTML_URL)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BotError::Search(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGo {
    async fn text(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let url = format!("{}?q={}", self.endpoint, urlencoding::encode(query));
        debug!(url = %url, "Fetching search results");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BotError::Search(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Search(format!("HTTP {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| BotError::Search(e.to_string()))?;
        let hits = parse_results(&body, max_results);

        if hits.is_empty() {
            warn!(query = %query, "No search results found");
        } else {
            info!(query = %query, count = hits.len(), "Search completed");
        }
        Ok(hits)
    }
}

static RESULT_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.result__a").expect("Invalid selector"));

/// Extract result links from a DuckDuckGo HTML page, in page order
pub fn parse_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);

    document
        .select(&RESULT_LINK)
        .filter_map(|link| {
            let href = resolve_href(link.value().attr("href")?)?;
            let title = link
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ");
            Some(SearchHit { title, href })
        })
        .take(max_results)
        .collect()
}

/// Unwrap DuckDuckGo's `/l/?uddg=` redirect and normalise scheme-relative links
fn resolve_href(raw: &str) -> Option<String> {
    if let Some(pos) = raw.find("uddg=") {
        let encoded = raw[pos + 5..].split('&').next()?;
        let decoded = urlencoding::decode(encoded).ok()?.into_owned();
        return decoded.starts_with("http").then_some(decoded);
    }

    if let Some(rest) = raw.strip_prefix("//") {
        return Some(format!("https://{}", rest));
    }

    raw.starts_with("http").then(|| raw.to_string())
}
