//! Mistral chat-completions provider
//!
//! Implements [`LlmProvider`] against the Mistral API, which follows the
//! chat-completions wire format. Handles tool calling, token accounting,
//! and exponential-backoff retry for rate limits and server errors.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::providers::{LlmMessage, LlmProvider, LlmResponse, LlmToolCall, ProviderError};

pub const MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";
pub const DEFAULT_MODEL: &str = "mistral-medium-latest";

/// Models the assistant exposes for selection
pub const SUPPORTED_MODELS: &[&str] = &[
    "mistral-medium-latest",
    "mistral-small-latest",
    "mistral-large-latest",
    "open-mistral-nemo",
];

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: String,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct WireFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
    error: Option<WireError>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
    #[allow(dead_code)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct WireError {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
    code: Option<String>,
}

/// Mistral API provider
#[derive(Debug, Clone)]
pub struct MistralProvider {
    api_key: String,
    base_url: String,
    default_model: String,
    timeout_seconds: u64,
    client: Client,
}

impl MistralProvider {
    /// Builds a provider against the public Mistral endpoint
    pub fn new(api_key: impl Into<String>, model: Option<String>) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, MISTRAL_BASE_URL, model, 30)
    }

    /// Builds a provider against a custom endpoint, for proxies and tests
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: Option<String>,
        timeout_seconds: u64,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ProviderError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            default_model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout_seconds,
            client,
        })
    }

    fn build_request(
        &self,
        messages: Vec<LlmMessage>,
        tools: Vec<serde_json::Value>,
        model: &str,
    ) -> ChatRequest {
        let wire_messages = messages
            .into_iter()
            .map(|msg| WireMessage {
                role: msg.role.as_str().to_string(),
                content: if msg.content.is_empty() {
                    None
                } else {
                    Some(msg.content)
                },
                tool_calls: msg.tool_calls.map(|calls| {
                    calls
                        .into_iter()
                        .map(|call| WireToolCall {
                            id: call.id,
                            call_type: "function".to_string(),
                            function: WireFunctionCall {
                                name: call.name,
                                arguments: call.arguments,
                            },
                        })
                        .collect()
                }),
                tool_call_id: msg.tool_call_id,
            })
            .collect();

        let tool_choice = if tools.is_empty() {
            None
        } else {
            Some("auto".to_string())
        };

        ChatRequest {
            model: model.to_string(),
            messages: wire_messages,
            tools,
            tool_choice,
        }
    }

    fn parse_response(&self, response: ChatResponse) -> Result<LlmResponse, ProviderError> {
        if let Some(error) = response.error {
            return Err(ProviderError::provider(
                error.message,
                error.code.or(error.error_type),
            ));
        }

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::provider("No response choices returned", None::<&str>))?;

        let tool_calls = choice.message.tool_calls.map(|calls| {
            calls
                .into_iter()
                .map(|call| LlmToolCall {
                    id: call.id,
                    name: call.function.name,
                    arguments: call.function.arguments,
                })
                .collect()
        });

        let mut llm_response = LlmResponse {
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            prompt_tokens: None,
            completion_tokens: None,
        };

        if let Some(usage) = response.usage {
            llm_response.prompt_tokens = Some(usage.prompt_tokens);
            llm_response.completion_tokens = Some(usage.completion_tokens);
        }

        Ok(llm_response)
    }

    async fn request_with_retry(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(attempt, url = %url, "Sending chat completion request");

            let response = self
                .client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(request)
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let status = resp.status();
                    debug!(status = %status, "Received response");

                    match status {
                        StatusCode::OK => {
                            let body = resp.json::<ChatResponse>().await.map_err(|e| {
                                ProviderError::serialization(format!(
                                    "Failed to parse response: {}",
                                    e
                                ))
                            })?;
                            return Ok(body);
                        }
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                            let error_text = resp.text().await.unwrap_or_default();
                            return Err(ProviderError::auth(format!(
                                "Authentication failed ({}): {}",
                                status, error_text
                            )));
                        }
                        StatusCode::TOO_MANY_REQUESTS => {
                            if attempt >= MAX_RETRIES {
                                let error_text = resp.text().await.unwrap_or_default();
                                return Err(ProviderError::rate_limit(
                                    format!(
                                        "Rate limit exceeded after {} retries: {}",
                                        MAX_RETRIES, error_text
                                    ),
                                    None,
                                ));
                            }

                            let delay = 2_u64.pow(attempt - 1); // 1s, 2s, 4s
                            warn!(attempt, delay_secs = delay, "Rate limited, backing off");
                            tokio::time::sleep(Duration::from_secs(delay)).await;
                            continue;
                        }
                        status if status.is_client_error() => {
                            let error_text = resp.text().await.unwrap_or_default();
                            return Err(ProviderError::invalid_request(format!(
                                "Client error ({}): {}",
                                status, error_text
                            )));
                        }
                        status if status.is_server_error() => {
                            let error_text = resp.text().await.unwrap_or_default();
                            if attempt < MAX_RETRIES {
                                let delay = 2_u64.pow(attempt - 1);
                                warn!(attempt, delay_secs = delay, "Server error, retrying");
                                tokio::time::sleep(Duration::from_secs(delay)).await;
                                continue;
                            }
                            return Err(ProviderError::provider(
                                format!(
                                    "Server error ({}) after {} attempts: {}",
                                    status, attempt, error_text
                                ),
                                Some(status.as_u16().to_string()),
                            ));
                        }
                        _ => {
                            let error_text = resp.text().await.unwrap_or_default();
                            return Err(ProviderError::provider(
                                format!("Unexpected status ({}): {}", status, error_text),
                                Some(status.as_u16().to_string()),
                            ));
                        }
                    }
                }
                Err(e) => {
                    error!(error = %e, "Request failed");

                    let provider_error = if e.is_timeout() {
                        ProviderError::timeout(self.timeout_seconds)
                    } else if e.is_connect() {
                        ProviderError::network(format!("Connection failed: {}", e))
                    } else {
                        ProviderError::network(format!("Request failed: {}", e))
                    };

                    if attempt < MAX_RETRIES && provider_error.is_retryable() {
                        let delay = provider_error.retry_after().unwrap_or(1);
                        warn!(attempt, delay_secs = delay, "Retrying after failure");
                        tokio::time::sleep(Duration::from_secs(delay)).await;
                        continue;
                    }

                    return Err(provider_error);
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for MistralProvider {
    async fn chat(
        &self,
        messages: Vec<LlmMessage>,
        tools: Vec<serde_json::Value>,
        model: &str,
    ) -> Result<LlmResponse, ProviderError> {
        info!(
            model,
            message_count = messages.len(),
            tool_count = tools.len(),
            "Sending chat request to Mistral"
        );

        let request = self.build_request(messages, tools, model);
        let response = self.request_with_retry(&request).await?;
        let llm_response = self.parse_response(response)?;

        info!(
            content_length = llm_response.content.len(),
            has_tool_calls = llm_response.has_tool_calls(),
            prompt_tokens = ?llm_response.prompt_tokens,
            completion_tokens = ?llm_response.completion_tokens,
            "Received Mistral response"
        );

        Ok(llm_response)
    }

    fn default_model(&self) -> String {
        self.default_model.clone()
    }

    fn provider_name(&self) -> &'static str {
        "mistral"
    }
}
