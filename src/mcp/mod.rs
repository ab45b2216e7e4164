//! MCP (Model Context Protocol) server implementation
//!
//! JSON-RPC over stdio for AI tool integration.

pub mod protocol;
pub mod tools;

pub use protocol::{
    methods, InitializeResult, McpHandler, McpRequest, McpResponse, McpServer,
    ResourceDefinition, ToolCallResult, ToolContent, ToolDefinition,
};
pub use tools::{get_resource_definitions, get_tool_definitions, SEARCH_TOOL_NAME};
