pub mod duckduckgo;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use duckduckgo::DuckDuckGo;

/// One web search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub href: String,
}

/// Text web search returning results in provider order
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn text(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}
