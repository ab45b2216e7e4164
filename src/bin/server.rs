//! Tavily search MCP server
//!
//! Run with: tavily-search-server

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tavily_search::error::{Result, SearchError};
use tavily_search::format::format_results;
use tavily_search::mcp::{
    get_resource_definitions, get_tool_definitions, methods, InitializeResult, McpHandler,
    McpRequest, McpResponse, McpServer, ToolCallResult, SEARCH_TOOL_NAME,
};
use tavily_search::tavily::{SearchProvider, TavilyClient, TavilyConfig, DEFAULT_BASE_URL};
use tavily_search::types::{SearchDepth, SearchQuery};

const INVALID_ARGUMENTS_MESSAGE: &str =
    "Error: Invalid arguments. A 'query' parameter is required.";

const TIMEOUT_MESSAGE: &str =
    "The search operation timed out. Please try again with a more specific query or check your internet connection.";

const AUTH_ERROR_MESSAGE: &str =
    "Authentication error occurred. Please check the API key configuration.";

const RATE_LIMIT_MESSAGE: &str =
    "Rate limit exceeded. Please wait a moment before trying again.";

#[derive(Parser, Debug)]
#[command(name = "tavily-search-server")]
#[command(about = "MCP server exposing Tavily web search")]
struct Args {
    /// Tavily API key
    #[arg(long, env = "TAVILY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Tavily API base URL
    #[arg(long, env = "TAVILY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Search timeout in seconds
    #[arg(long, env = "TAVILY_SEARCH_TIMEOUT", default_value = "30")]
    search_timeout: u64,
}

/// Validated arguments of the `search` tool
#[derive(Debug, Deserialize)]
struct SearchToolArgs {
    query: String,
    #[serde(default)]
    search_depth: SearchDepth,
}

/// Map raw provider error text to a user-facing message.
///
/// Classification is a case-insensitive substring match on the raw text;
/// the provider's error taxonomy is unspecified, so nothing stronger is
/// inferred from it.
fn classify_provider_error(message: &str) -> String {
    let lower = message.to_lowercase();
    if lower.contains("api_key") {
        AUTH_ERROR_MESSAGE.to_string()
    } else if lower.contains("rate limit") {
        RATE_LIMIT_MESSAGE.to_string()
    } else {
        format!(
            "An unexpected error occurred during the search. Please try again later. Error: {}",
            message
        )
    }
}

/// MCP request handler
struct SearchHandler {
    provider: Arc<dyn SearchProvider>,
    runtime: tokio::runtime::Handle,
    search_timeout: Duration,
}

impl SearchHandler {
    fn new(
        provider: Arc<dyn SearchProvider>,
        runtime: tokio::runtime::Handle,
        search_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            runtime,
            search_timeout,
        }
    }

    /// Validate and execute one tool call. Every outcome, including
    /// failure, is a single text content item.
    fn handle_tool_call(&self, name: &str, arguments: Value) -> ToolCallResult {
        tracing::info!("Tool call received - name: {}, arguments: {}", name, arguments);

        if name != SEARCH_TOOL_NAME {
            tracing::error!("Unknown tool requested: {}", name);
            return ToolCallResult::error(format!(
                "Error: Unknown tool '{}'. Only 'search' is supported.",
                name
            ));
        }

        let args: SearchToolArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                tracing::error!("Invalid arguments provided: {}", e);
                return ToolCallResult::error(INVALID_ARGUMENTS_MESSAGE);
            }
        };
        if args.query.is_empty() {
            tracing::error!("Empty query provided");
            return ToolCallResult::error(INVALID_ARGUMENTS_MESSAGE);
        }

        let query = SearchQuery::new(&args.query, args.search_depth);
        tracing::info!("Executing search with query: '{}'", args.query);

        // Dropping the timed-out future cancels the in-flight request
        let outcome = self.runtime.block_on(async {
            tokio::time::timeout(self.search_timeout, self.provider.search(&query)).await
        });

        match outcome {
            Err(_) => {
                tracing::error!(
                    "Search operation timed out after {} seconds",
                    self.search_timeout.as_secs()
                );
                ToolCallResult::error(TIMEOUT_MESSAGE)
            }
            Ok(Err(e)) => {
                // Provider errors already carry the raw provider text
                let message = match &e {
                    SearchError::Provider(text) => text.clone(),
                    other => other.to_string(),
                };
                tracing::error!("Search failed: {}", message);
                ToolCallResult::error(classify_provider_error(&message))
            }
            Ok(Ok(response)) => {
                tracing::info!("Search completed");
                ToolCallResult::text(format_results(&response))
            }
        }
    }
}

impl McpHandler for SearchHandler {
    fn handle_request(&self, request: McpRequest) -> McpResponse {
        match request.method.as_str() {
            methods::INITIALIZE => {
                let result = InitializeResult::default();
                McpResponse::success(request.id, json!(result))
            }
            methods::INITIALIZED => {
                // Notification, no response needed
                McpResponse::success(request.id, json!({}))
            }
            methods::LIST_TOOLS => {
                tracing::info!("Listing available tools");
                let tools = get_tool_definitions();
                McpResponse::success(request.id, json!({"tools": tools}))
            }
            methods::LIST_RESOURCES => {
                tracing::info!("Listing available resources");
                let resources = get_resource_definitions();
                McpResponse::success(request.id, json!({"resources": resources}))
            }
            methods::CALL_TOOL => {
                let name = request
                    .params
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                let arguments = request
                    .params
                    .get("arguments")
                    .cloned()
                    .unwrap_or(json!({}));

                let result = self.handle_tool_call(name, arguments);
                McpResponse::success(request.id, json!(result))
            }
            _ => McpResponse::error(
                request.id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging to stderr (stdout is for MCP protocol)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load .env before clap resolves env-var arguments
    dotenv::dotenv().ok();
    let args = Args::parse();

    let api_key = match args.api_key {
        Some(key) if !key.is_empty() => key,
        _ => {
            tracing::error!("TAVILY_API_KEY environment variable not found");
            return Err(SearchError::Config(
                "TAVILY_API_KEY environment variable required".to_string(),
            ));
        }
    };

    let config = TavilyConfig::new(api_key).with_base_url(args.base_url);
    let provider: Arc<dyn SearchProvider> = Arc::new(TavilyClient::new(config));

    let runtime = tokio::runtime::Runtime::new()?;

    // Exit the blocking stdin loop cleanly on interrupt
    runtime.spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Server shutdown requested");
            std::process::exit(0);
        }
    });

    let handler = SearchHandler::new(
        provider,
        runtime.handle().clone(),
        Duration::from_secs(args.search_timeout),
    );
    let server = McpServer::new(handler);

    tracing::info!("Tavily search MCP server starting...");
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use tavily_search::types::{SearchResponse, SearchResultItem};

    /// Provider returning a fixed response, counting invocations
    struct StaticProvider {
        response: SearchResponse,
        calls: AtomicUsize,
    }

    impl StaticProvider {
        fn new(response: SearchResponse) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SearchProvider for StaticProvider {
        async fn search(&self, _query: &SearchQuery) -> Result<SearchResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    /// Provider failing with a fixed error message
    struct FailingProvider {
        message: String,
    }

    #[async_trait]
    impl SearchProvider for FailingProvider {
        async fn search(&self, _query: &SearchQuery) -> Result<SearchResponse> {
            Err(SearchError::Provider(self.message.clone()))
        }
    }

    /// Provider that never completes within the test timeout
    struct SlowProvider;

    #[async_trait]
    impl SearchProvider for SlowProvider {
        async fn search(&self, _query: &SearchQuery) -> Result<SearchResponse> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(SearchResponse::default())
        }
    }

    struct TestContext {
        handler: SearchHandler,
        // Dropped last; the handler's Handle points into it
        _runtime: tokio::runtime::Runtime,
    }

    fn context(provider: Arc<dyn SearchProvider>, timeout: Duration) -> TestContext {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let handler = SearchHandler::new(provider, runtime.handle().clone(), timeout);
        TestContext {
            handler,
            _runtime: runtime,
        }
    }

    fn text_of(result: &ToolCallResult) -> &str {
        let tavily_search::mcp::ToolContent::Text { text } = &result.content[0];
        text
    }

    #[test]
    fn unknown_tool_is_rejected_without_searching() {
        let provider = Arc::new(StaticProvider::new(SearchResponse::default()));
        let ctx = context(provider.clone(), Duration::from_secs(1));

        let result = ctx
            .handler
            .handle_tool_call("lookup", json!({"query": "rust"}));
        assert_eq!(
            text_of(&result),
            "Error: Unknown tool 'lookup'. Only 'search' is supported."
        );
        assert_eq!(result.is_error, Some(true));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn missing_query_is_rejected_without_searching() {
        let provider = Arc::new(StaticProvider::new(SearchResponse::default()));
        let ctx = context(provider.clone(), Duration::from_secs(1));

        let result = ctx.handler.handle_tool_call("search", json!({}));
        assert_eq!(text_of(&result), INVALID_ARGUMENTS_MESSAGE);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn non_string_query_is_rejected() {
        let provider = Arc::new(StaticProvider::new(SearchResponse::default()));
        let ctx = context(provider, Duration::from_secs(1));

        let result = ctx.handler.handle_tool_call("search", json!({"query": 42}));
        assert_eq!(text_of(&result), INVALID_ARGUMENTS_MESSAGE);
    }

    #[test]
    fn invalid_search_depth_is_rejected() {
        let provider = Arc::new(StaticProvider::new(SearchResponse::default()));
        let ctx = context(provider, Duration::from_secs(1));

        let result = ctx
            .handler
            .handle_tool_call("search", json!({"query": "rust", "search_depth": "deep"}));
        assert_eq!(text_of(&result), INVALID_ARGUMENTS_MESSAGE);
    }

    #[test]
    fn timeout_returns_timeout_message() {
        let ctx = context(Arc::new(SlowProvider), Duration::from_millis(50));

        let result = ctx.handler.handle_tool_call("search", json!({"query": "rust"}));
        assert_eq!(text_of(&result), TIMEOUT_MESSAGE);
        assert_eq!(result.is_error, Some(true));
    }

    #[test]
    fn api_key_error_is_classified_case_insensitively() {
        let ctx = context(
            Arc::new(FailingProvider {
                message: "Search API error 401 Unauthorized: invalid API_KEY".to_string(),
            }),
            Duration::from_secs(1),
        );

        let result = ctx.handler.handle_tool_call("search", json!({"query": "rust"}));
        assert_eq!(text_of(&result), AUTH_ERROR_MESSAGE);
    }

    #[test]
    fn rate_limit_error_is_classified() {
        let ctx = context(
            Arc::new(FailingProvider {
                message: "Search API error 429 Too Many Requests: Rate Limit exceeded".to_string(),
            }),
            Duration::from_secs(1),
        );

        let result = ctx.handler.handle_tool_call("search", json!({"query": "rust"}));
        assert_eq!(text_of(&result), RATE_LIMIT_MESSAGE);
    }

    #[test]
    fn other_provider_errors_embed_raw_text() {
        let ctx = context(
            Arc::new(FailingProvider {
                message: "connection reset by peer".to_string(),
            }),
            Duration::from_secs(1),
        );

        let result = ctx.handler.handle_tool_call("search", json!({"query": "rust"}));
        assert_eq!(
            text_of(&result),
            "An unexpected error occurred during the search. Please try again later. \
             Error: connection reset by peer"
        );
    }

    #[test]
    fn successful_search_returns_formatted_text() {
        let provider = Arc::new(StaticProvider::new(SearchResponse {
            answer: Some("Paris".to_string()),
            results: vec![SearchResultItem {
                title: Some("France".to_string()),
                url: Some("https://example.org".to_string()),
                snippet: Some("The capital of France is Paris.".to_string()),
            }],
        }));
        let ctx = context(provider.clone(), Duration::from_secs(1));

        let result = ctx
            .handler
            .handle_tool_call("search", json!({"query": "capital of France"}));
        let text = text_of(&result);
        assert!(text.starts_with("AI Answer:\nParis"));
        assert!(text.contains("1. France"));
        assert!(text.contains("URL: https://example.org"));
        assert!(result.is_error.is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_provider_response_returns_fallback_text() {
        let provider = Arc::new(StaticProvider::new(SearchResponse::default()));
        let ctx = context(provider, Duration::from_secs(1));

        let result = ctx.handler.handle_tool_call("search", json!({"query": "rust"}));
        assert_eq!(
            text_of(&result),
            "No results were found for your query. Please try a different search term."
        );
        assert!(result.is_error.is_none());
    }

    #[test]
    fn initialize_reports_tools_and_resources_capabilities() {
        let ctx = context(
            Arc::new(StaticProvider::new(SearchResponse::default())),
            Duration::from_secs(1),
        );

        let response = ctx.handler.handle_request(McpRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(1.into()),
            method: "initialize".to_string(),
            params: json!({}),
        });
        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "tavily-search");
        assert!(result["capabilities"]["tools"].is_object());
        assert!(result["capabilities"]["resources"].is_object());
    }

    #[test]
    fn list_methods_advertise_one_tool_and_one_resource() {
        let ctx = context(
            Arc::new(StaticProvider::new(SearchResponse::default())),
            Duration::from_secs(1),
        );

        let response = ctx.handler.handle_request(McpRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(1.into()),
            method: "tools/list".to_string(),
            params: json!({}),
        });
        let tools = response.result.unwrap()["tools"].clone();
        assert_eq!(tools.as_array().unwrap().len(), 1);
        assert_eq!(tools[0]["name"], "search");

        let response = ctx.handler.handle_request(McpRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(2.into()),
            method: "resources/list".to_string(),
            params: json!({}),
        });
        let resources = response.result.unwrap()["resources"].clone();
        assert_eq!(resources.as_array().unwrap().len(), 1);
        assert_eq!(resources[0]["mimeType"], "application/json");
    }

    #[test]
    fn unknown_method_returns_method_not_found() {
        let ctx = context(
            Arc::new(StaticProvider::new(SearchResponse::default())),
            Duration::from_secs(1),
        );

        let response = ctx.handler.handle_request(McpRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(1.into()),
            method: "resources/read".to_string(),
            params: json!({}),
        });
        assert_eq!(response.error.unwrap().code, -32601);
    }
}
