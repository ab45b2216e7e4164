//! Error types for the search server

use thiserror::Error;

/// Result type alias for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Main error type for the search server
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Raw error text from the search provider (auth failures, rate
    /// limiting, malformed responses). The dispatcher classifies this
    /// text; it is never rewritten here.
    #[error("Search provider error: {0}")]
    Provider(String),

    #[error("Search timed out after {0} seconds")]
    Timeout(u64),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SearchError {
    /// Get error code for MCP protocol
    pub fn code(&self) -> i64 {
        match self {
            SearchError::InvalidInput(_) => -32602,
            SearchError::Config(_) => -32002,
            SearchError::Timeout(_) => -32001,
            _ => -32000,
        }
    }
}
