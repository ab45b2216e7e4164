//! Tool and resource definitions advertised by the server

use serde_json::json;

use super::protocol::{ResourceDefinition, ToolDefinition};

/// Name of the single tool this server exposes
pub const SEARCH_TOOL_NAME: &str = "search";

/// All tool definitions: (name, description, input schema)
pub const TOOL_DEFINITIONS: &[(&str, &str, &str)] = &[(
    SEARCH_TOOL_NAME,
    "Search the web using Tavily API",
    r#"{
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "Search query"
            },
            "search_depth": {
                "type": "string",
                "description": "Search depth (basic or advanced)",
                "enum": ["basic", "advanced"]
            }
        },
        "required": ["query"]
    }"#,
)];

/// Static example resources: (uri, name, description, mimeType)
pub const RESOURCE_DEFINITIONS: &[(&str, &str, &str, &str)] = &[(
    "websearch://query=who%20is%20the%20current%20Prime%20Minister%20of%20Japan&search_depth=basic",
    "Web search about the current Prime Minister of Japan. There are two types of search_depth: 'basic' and 'advanced', with 'advanced' searching deeper.",
    "General web search using Tavily API",
    "application/json",
)];

/// Get all tool definitions as ToolDefinition structs
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    TOOL_DEFINITIONS
        .iter()
        .map(|(name, description, schema)| ToolDefinition {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: serde_json::from_str(schema).unwrap_or(json!({})),
        })
        .collect()
}

/// Get all resource definitions as ResourceDefinition structs
pub fn get_resource_definitions() -> Vec<ResourceDefinition> {
    RESOURCE_DEFINITIONS
        .iter()
        .map(|(uri, name, description, mime_type)| ResourceDefinition {
            uri: uri.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            mime_type: mime_type.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advertises_exactly_one_tool() {
        let tools = get_tool_definitions();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "search");

        let schema = &tools[0].input_schema;
        assert_eq!(schema["required"], serde_json::json!(["query"]));
        assert_eq!(schema["properties"]["query"]["type"], "string");
        assert_eq!(
            schema["properties"]["search_depth"]["enum"],
            serde_json::json!(["basic", "advanced"])
        );
    }

    #[test]
    fn advertises_exactly_one_resource() {
        let resources = get_resource_definitions();
        assert_eq!(resources.len(), 1);
        assert!(resources[0].uri.starts_with("websearch://"));
        assert_eq!(resources[0].mime_type, "application/json");
    }
}
