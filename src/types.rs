//! Core types for the search server

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Search thoroughness requested from the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

impl std::str::FromStr for SearchDepth {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(SearchDepth::Basic),
            "advanced" => Ok(SearchDepth::Advanced),
            _ => Err(SearchError::InvalidInput(format!(
                "Unknown search depth: '{}'. Use 'basic' or 'advanced'",
                s
            ))),
        }
    }
}

/// One search request to the provider. Built once per tool call and
/// immutable afterwards; serializes directly as the Tavily request body.
#[derive(Debug, Clone, Serialize)]
pub struct SearchQuery {
    pub query: String,
    pub search_depth: SearchDepth,
    pub include_images: bool,
    pub include_answer: bool,
    pub max_results: u32,
    pub topic: String,
}

impl SearchQuery {
    /// Create a query with the server's fixed provider parameters.
    pub fn new(query: impl Into<String>, search_depth: SearchDepth) -> Self {
        Self {
            query: query.into(),
            search_depth,
            include_images: false,
            include_answer: true,
            max_results: 3,
            topic: "general".to_string(),
        }
    }
}

/// Provider response. Every field is optional so partial or malformed
/// provider JSON still deserializes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<SearchResultItem>,
}

/// A single result item from the provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResultItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

/// Direct answer to a question, with the results it was drawn from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectAnswer {
    pub answer: String,
    pub sources: Vec<SearchResultItem>,
}
