//! LLM provider abstraction
//!
//! A single trait covers chat completion with tool calling; the Mistral
//! implementation lives in [`mistral`]. Messages use the chat-completions
//! role model so tool results can be threaded back to the API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub mod error;
#[cfg(test)]
pub mod mock;
pub mod mistral;

pub use error::ProviderError;
pub use mistral::MistralProvider;

/// A message in the LLM conversation context
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmMessage {
    pub role: LlmRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<LlmToolCall>>,
    /// Set on tool-result messages to link them to the originating call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl LlmMessage {
    pub fn new(role: LlmRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn with_tool_calls(mut self, tool_calls: Vec<LlmToolCall>) -> Self {
        self.tool_calls = Some(tool_calls);
        self
    }

    pub fn with_tool_call_id(mut self, id: impl Into<String>) -> Self {
        self.tool_call_id = Some(id.into());
        self
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmRole {
    System,
    User,
    Assistant,
    Tool,
}

impl LlmRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmRole::System => "system",
            LlmRole::User => "user",
            LlmRole::Assistant => "assistant",
            LlmRole::Tool => "tool",
        }
    }
}

impl fmt::Display for LlmRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tool call requested by the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmToolCall {
    pub id: String,
    pub name: String,
    /// JSON-encoded arguments as the model emitted them
    pub arguments: String,
}

impl LlmToolCall {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// Response from a chat completion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmResponse {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<LlmToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u32>,
}

impl LlmResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: None,
            prompt_tokens: None,
            completion_tokens: None,
        }
    }

    pub fn with_tool_calls(mut self, tool_calls: Vec<LlmToolCall>) -> Self {
        self.tool_calls = Some(tool_calls);
        self
    }

    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// Trait for chat-completion providers with tool calling
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Sends the conversation and tool definitions, returns the next turn
    ///
    /// Tool definitions are raw JSON in the chat-completions function
    /// format so providers with schema quirks can adapt them.
    async fn chat(
        &self,
        messages: Vec<LlmMessage>,
        tools: Vec<Value>,
        model: &str,
    ) -> Result<LlmResponse, ProviderError>;

    fn default_model(&self) -> String;

    fn provider_name(&self) -> &'static str;
}

const TRIM_ARRAY_LIMIT: usize = 8;
const TRIM_STRING_LIMIT: usize = 150;

/// Shrinks a tool result before it is sent back to the model
///
/// Arrays are cut to their first eight elements and long strings to 150
/// characters ending in "...", recursively. Keeps tool payloads from
/// blowing out the context window while preserving enough rows to answer
/// from.
pub fn trim_payload(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .take(TRIM_ARRAY_LIMIT)
                .map(trim_payload)
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), trim_payload(v)))
                .collect(),
        ),
        Value::String(s) => {
            if s.chars().count() > TRIM_STRING_LIMIT {
                let mut cut: String = s.chars().take(TRIM_STRING_LIMIT - 3).collect();
                cut.push_str("...");
                Value::String(cut)
            } else {
                value.clone()
            }
        }
        _ => value.clone(),
    }
}
