//! Tavily search API client
//!
//! One outbound HTTPS round trip per call, no retries. Failures surface
//! the provider's raw error text so callers can classify it.

use async_trait::async_trait;

use crate::error::{Result, SearchError};
use crate::types::{DirectAnswer, SearchDepth, SearchQuery, SearchResponse};

/// Default Tavily API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Placeholder answer for direct-answer calls the provider left empty
const NO_ANSWER_PLACEHOLDER: &str = "No answer was generated for this query.";

/// Tavily client configuration. Constructed once at startup and treated
/// as read-only afterwards.
#[derive(Debug, Clone)]
pub struct TavilyConfig {
    pub api_key: String,
    pub base_url: String,
}

impl TavilyConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create config from the `TAVILY_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("TAVILY_API_KEY").map_err(|_| {
            SearchError::Config("TAVILY_API_KEY environment variable required".to_string())
        })?;
        Ok(Self::new(api_key))
    }

    /// Override the API endpoint (mock servers, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Outbound search seam between the dispatcher and the provider HTTP API
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Execute one search request against the provider
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse>;
}

/// HTTP client for the Tavily search API
pub struct TavilyClient {
    client: reqwest::Client,
    config: TavilyConfig,
}

impl TavilyClient {
    pub fn new(config: TavilyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn post_search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        let url = format!("{}/search", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(SearchError::Provider(format!(
                "Search API error {}: {}",
                status, text
            )));
        }

        let results: SearchResponse = response.json().await?;
        Ok(results)
    }

    /// Direct answer to a question.
    ///
    /// Runs a basic-depth search with the fixed server parameters and
    /// returns the AI answer together with the results it was drawn from.
    pub async fn answer(&self, query: &str) -> Result<DirectAnswer> {
        let response = self
            .post_search(&SearchQuery::new(query, SearchDepth::Basic))
            .await?;

        Ok(DirectAnswer {
            answer: response
                .answer
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| NO_ANSWER_PLACEHOLDER.to_string()),
            sources: response.results,
        })
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        self.post_search(query).await
    }
}
