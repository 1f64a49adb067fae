//! Scripted LLM provider for testing
//!
//! Queues responses that `chat()` pops in order, so multi-step agent
//! turns (tool call, then final answer) can be exercised without the
//! network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::providers::{LlmMessage, LlmProvider, LlmResponse, LlmToolCall, ProviderError};

pub struct MockLlmProvider {
    script: Arc<Mutex<VecDeque<Result<LlmResponse, ProviderError>>>>,
    call_count: Arc<Mutex<usize>>,
    last_messages: Arc<Mutex<Option<Vec<LlmMessage>>>>,
    last_tools: Arc<Mutex<Option<Vec<serde_json::Value>>>>,
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_messages: Arc::new(Mutex::new(None)),
            last_tools: Arc::new(Mutex::new(None)),
        }
    }

    /// Queues a plain text response
    pub fn push_text(&self, content: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(LlmResponse::new(content)));
    }

    /// Queues a response that requests tool calls
    pub fn push_tool_calls(&self, content: impl Into<String>, tool_calls: Vec<LlmToolCall>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(LlmResponse::new(content).with_tool_calls(tool_calls)));
    }

    /// Queues an error
    pub fn push_error(&self, error: ProviderError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Messages from the most recent `chat()` call
    pub fn last_messages(&self) -> Option<Vec<LlmMessage>> {
        self.last_messages.lock().unwrap().clone()
    }

    /// Tool definitions from the most recent `chat()` call
    pub fn last_tools(&self) -> Option<Vec<serde_json::Value>> {
        self.last_tools.lock().unwrap().clone()
    }
}

impl Default for MockLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmProvider for MockLlmProvider {
    async fn chat(
        &self,
        messages: Vec<LlmMessage>,
        tools: Vec<serde_json::Value>,
        _model: &str,
    ) -> Result<LlmResponse, ProviderError> {
        *self.call_count.lock().unwrap() += 1;
        *self.last_messages.lock().unwrap() = Some(messages);
        *self.last_tools.lock().unwrap() = Some(tools);

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(LlmResponse::new("Scripted response exhausted")))
    }

    fn default_model(&self) -> String {
        "mock-model".to_string()
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::LlmRole;

    #[tokio::test]
    async fn test_scripted_responses_in_order() {
        let mock = MockLlmProvider::new();
        mock.push_tool_calls("", vec![LlmToolCall::new("call_1", "get_charts", "{}")]);
        mock.push_text("Here are your charts.");

        let first = mock.chat(vec![], vec![], "m").await.unwrap();
        assert!(first.has_tool_calls());

        let second = mock.chat(vec![], vec![], "m").await.unwrap();
        assert_eq!(second.content, "Here are your charts.");
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_scripted_error() {
        let mock = MockLlmProvider::new();
        mock.push_error(ProviderError::network("Connection failed"));

        let err = mock.chat(vec![], vec![], "m").await.unwrap_err();
        assert!(err.to_string().contains("Network error"));
    }

    #[tokio::test]
    async fn test_records_messages_and_tools() {
        let mock = MockLlmProvider::new();
        mock.push_text("ok");

        let messages = vec![LlmMessage::new(LlmRole::User, "Hi")];
        let tools = vec![serde_json::json!({ "type": "function" })];
        mock.chat(messages, tools, "m").await.unwrap();

        assert_eq!(mock.last_messages().unwrap().len(), 1);
        assert_eq!(mock.last_tools().unwrap().len(), 1);
    }

    #[test]
    fn test_mock_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockLlmProvider>();
    }
}
