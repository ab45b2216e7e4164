//! Tavily Search - single-tool MCP server
//!
//! Exposes Tavily web search as one MCP tool over JSON-RPC on stdio,
//! plus a small client library for direct use.

pub mod error;
pub mod format;
pub mod mcp;
pub mod tavily;
pub mod types;

pub use error::{Result, SearchError};
pub use tavily::{SearchProvider, TavilyClient, TavilyConfig};
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
