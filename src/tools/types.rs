//! Types for the tool system
//!
//! This module defines the core contracts shared by the registry, the
//! dispatcher and the library view:
//! - ToolDefinition for built-in tools
//! - CustomTool for session-created skills
//! - CatalogTool, the merged read interface over both shapes
//! - ToolError and argument validation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error types for tool lookup and execution
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    /// Tool not found in the merged catalog
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// A required parameter is missing or empty
    #[error("Invalid arguments for tool '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    /// Handler failed to produce a result
    #[error("Tool '{tool}' execution failed: {message}")]
    ExecutionFailed { tool: String, message: String },
}

impl ToolError {
    /// Get the tool name from the error
    pub fn tool_name(&self) -> &str {
        match self {
            ToolError::NotFound(name) => name,
            ToolError::InvalidArguments { tool, .. } => tool,
            ToolError::ExecutionFailed { tool, .. } => tool,
        }
    }
}

/// Result type for tool operations
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Definition of a built-in tool exposed to the assistant model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// Tool name (unique identifier, stable for the process lifetime)
    pub name: String,
    /// Tool description for the model
    pub description: String,
    /// JSON Schema for the tool's parameters
    pub parameters: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Converts to the OpenAI-compatible function-calling envelope
    pub fn to_wire_format(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// A session-created tool/skill, produced by a `skill_created` result
///
/// Carries the same callable shape as a built-in plus the system prompt
/// that governs the assistant while the skill is active. Custom tools are
/// appended whole to the session catalog and never silently deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomTool {
    /// Identifier derived from the title (lowercase, whitespace to '-')
    pub name: String,
    /// Display title as the assistant provided it
    pub label: String,
    /// Short summary of what the skill does
    pub description: String,
    /// Parameter schema; customs created through `create_skill` take none
    pub parameters: Value,
    /// Instruction the assistant follows when this skill is active
    pub system_prompt: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl CustomTool {
    /// Builds a custom tool from a `skill_created` result payload
    pub fn from_created(title: &str, description: &str, system_prompt: &str) -> Self {
        Self {
            name: slugify(title),
            label: title.to_string(),
            description: description.to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
            system_prompt: system_prompt.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn to_wire_format(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// Derives a stable identifier from a display title
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Merged read interface over built-in and custom tool shapes
///
/// The two shapes differ (customs carry a system prompt and label), so the
/// catalog hands out this tagged view instead of forcing callers to probe
/// optional fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatalogTool<'a> {
    BuiltIn(&'a ToolDefinition),
    Custom(&'a CustomTool),
}

impl<'a> CatalogTool<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            CatalogTool::BuiltIn(def) => &def.name,
            CatalogTool::Custom(tool) => &tool.name,
        }
    }

    pub fn description(&self) -> &'a str {
        match self {
            CatalogTool::BuiltIn(def) => &def.description,
            CatalogTool::Custom(tool) => &tool.description,
        }
    }

    pub fn parameters(&self) -> &'a Value {
        match self {
            CatalogTool::BuiltIn(def) => &def.parameters,
            CatalogTool::Custom(tool) => &tool.parameters,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, CatalogTool::Custom(_))
    }

    /// Parameter names declared under the schema's `properties`
    ///
    /// A tool with no `properties` object lists zero parameters rather
    /// than failing.
    pub fn parameter_names(&self) -> Vec<String> {
        self.parameters()
            .get("properties")
            .and_then(|p| p.as_object())
            .map(|props| props.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn to_wire_format(&self) -> Value {
        match self {
            CatalogTool::BuiltIn(def) => def.to_wire_format(),
            CatalogTool::Custom(tool) => tool.to_wire_format(),
        }
    }
}

/// Validates arguments against a tool's declared parameter schema
///
/// Checks that every entry in the schema's `required` array is present,
/// and that required string parameters are non-empty.
pub fn validate_args(
    args: &HashMap<String, Value>,
    schema: &Value,
    tool_name: &str,
) -> ToolResult<()> {
    let required = schema
        .get("required")
        .and_then(|r| r.as_array())
        .cloned()
        .unwrap_or_default();

    for entry in &required {
        let Some(field) = entry.as_str() else {
            continue;
        };

        match args.get(field) {
            None => {
                return Err(ToolError::InvalidArguments {
                    tool: tool_name.to_string(),
                    message: format!("Missing required parameter '{}'", field),
                });
            }
            Some(value) => {
                if value.as_str().is_some_and(|s| s.trim().is_empty()) {
                    return Err(ToolError::InvalidArguments {
                        tool: tool_name.to_string(),
                        message: format!("Required parameter '{}' is empty", field),
                    });
                }
            }
        }
    }

    Ok(())
}

/// Extracts a required non-empty string argument
pub fn require_str<'a>(
    args: &'a HashMap<String, Value>,
    field: &str,
    tool_name: &str,
) -> ToolResult<&'a str> {
    args.get(field)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ToolError::InvalidArguments {
            tool: tool_name.to_string(),
            message: format!("Missing required parameter '{}'", field),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "skill": { "type": "string" }
            },
            "required": ["skill"]
        })
    }

    #[test]
    fn test_validate_args_ok() {
        let mut args = HashMap::new();
        args.insert("skill".to_string(), json!("analyst"));
        assert!(validate_args(&args, &schema(), "set_skill").is_ok());
    }

    #[test]
    fn test_validate_args_missing() {
        let args = HashMap::new();
        let err = validate_args(&args, &schema(), "set_skill").unwrap_err();
        match err {
            ToolError::InvalidArguments { tool, message } => {
                assert_eq!(tool, "set_skill");
                assert!(message.contains("skill"));
            }
            _ => panic!("Expected InvalidArguments error"),
        }
    }

    #[test]
    fn test_validate_args_empty_string_rejected() {
        let mut args = HashMap::new();
        args.insert("skill".to_string(), json!("   "));
        assert!(validate_args(&args, &schema(), "set_skill").is_err());
    }

    #[test]
    fn test_validate_args_no_required_section() {
        let args = HashMap::new();
        let open_schema = json!({ "type": "object", "properties": {} });
        assert!(validate_args(&args, &open_schema, "get_charts").is_ok());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Data Scientist"), "data-scientist");
        assert_eq!(slugify("  Late  Night DJ "), "late-night-dj");
        assert_eq!(slugify("default"), "default");
    }

    #[test]
    fn test_custom_tool_from_created() {
        let tool = CustomTool::from_created(
            "Data Scientist",
            "Analyzes data",
            "You are a data scientist...",
        );
        assert_eq!(tool.name, "data-scientist");
        assert_eq!(tool.label, "Data Scientist");
        assert_eq!(tool.system_prompt, "You are a data scientist...");
        assert!(CatalogTool::Custom(&tool).parameter_names().is_empty());
    }

    #[test]
    fn test_catalog_tool_accessors() {
        let def = ToolDefinition::new(
            "get_charts",
            "Get the current music charts.",
            json!({
                "type": "object",
                "properties": { "period": { "type": "string" } },
                "required": ["period"]
            }),
        );
        let view = CatalogTool::BuiltIn(&def);

        assert_eq!(view.name(), "get_charts");
        assert!(!view.is_custom());
        assert_eq!(view.parameter_names(), vec!["period".to_string()]);
    }

    #[test]
    fn test_catalog_tool_missing_properties() {
        let def = ToolDefinition::new("bare", "No params", json!({ "type": "object" }));
        let view = CatalogTool::BuiltIn(&def);
        assert!(view.parameter_names().is_empty());
    }

    #[test]
    fn test_wire_format_envelope() {
        let def = ToolDefinition::new("set_skill", "Switch skill", json!({"type": "object"}));
        let wire = def.to_wire_format();
        assert_eq!(wire["type"], "function");
        assert_eq!(wire["function"]["name"], "set_skill");
        assert_eq!(wire["function"]["description"], "Switch skill");
    }

    #[test]
    fn test_tool_error_tool_name() {
        let err = ToolError::NotFound("mystery".to_string());
        assert_eq!(err.tool_name(), "mystery");

        let err = ToolError::InvalidArguments {
            tool: "create_skill".to_string(),
            message: "bad args".to_string(),
        };
        assert_eq!(err.tool_name(), "create_skill");
    }
}
