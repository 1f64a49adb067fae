//! The assistant turn loop
//!
//! Drives one request: call the model, execute any requested tool calls,
//! feed the results back, and repeat until the model answers in text or
//! the iteration cap is hit. Emits [`TurnEvent`]s so callers can render
//! progress as it happens.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::agent::context::build_context;
use crate::providers::{LlmMessage, LlmProvider, LlmRole, LlmToolCall, trim_payload};
use crate::session::{Applied, RequestTicket, SessionState, ToolCall};
use crate::tools::dispatch::{ToolInvocation, dispatch};
use crate::tools::stats::StatsSource;
use crate::tools::types::ToolError;

/// Iteration cap for one turn, to stop tool-call loops
pub const MAX_ITERATIONS: u32 = 8;

/// Errors that end a turn without an answer
#[derive(thiserror::Error, Debug)]
pub enum AgentError {
    #[error("LLM communication failed: {0}")]
    LlmError(String),

    #[error("Max iterations ({0}) reached")]
    MaxIterationsReached(u32),
}

pub type Result<T> = std::result::Result<T, AgentError>;

/// Progress events emitted while a turn runs
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    /// The model's final text answer
    Text(String),
    /// A tool call was dispatched
    ToolCall { name: String },
    /// A tool produced its payload
    ToolResult { name: String, payload: Value },
    /// A non-fatal problem, shown to the user but the turn continues
    Notice(String),
}

/// Orchestrates turns for one session against a provider
pub struct SpotlightAgent {
    provider: Arc<dyn LlmProvider>,
    stats: Arc<dyn StatsSource>,
    model: String,
}

impl SpotlightAgent {
    pub fn new(provider: Arc<dyn LlmProvider>, stats: Arc<dyn StatsSource>) -> Self {
        let model = provider.default_model();
        Self {
            provider,
            stats,
            model,
        }
    }

    pub fn with_model(
        provider: Arc<dyn LlmProvider>,
        stats: Arc<dyn StatsSource>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            stats,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Runs one turn under `ticket`, mutating the session as outcomes land
    ///
    /// If the session gets superseded mid-turn the loop stops quietly:
    /// events gathered so far are returned but no final message is
    /// recorded, the superseding request owns the transcript.
    pub async fn run_turn(
        &self,
        session: &mut SessionState,
        ticket: &RequestTicket,
    ) -> Result<Vec<TurnEvent>> {
        let mut context = build_context(session);
        let mut events = Vec::new();

        for iteration in 1..=MAX_ITERATIONS {
            debug!(iteration, model = %self.model, "Turn iteration");

            let tools = session.catalog().wire_definitions();
            let response = self
                .provider
                .chat(context.clone(), tools, &self.model)
                .await
                .map_err(|e| {
                    session.abort_request(ticket);
                    AgentError::LlmError(e.to_string())
                })?;

            let Some(tool_calls) = response
                .tool_calls
                .filter(|calls| !calls.is_empty())
            else {
                // Text answer ends the turn
                if session.finish_request(ticket, &response.content) == Applied::Accepted {
                    events.push(TurnEvent::Text(response.content));
                } else {
                    debug!("Turn superseded before final answer, dropping it");
                }
                return Ok(events);
            };

            info!(tool_count = tool_calls.len(), "Model requested tool calls");
            context.push(
                LlmMessage::new(LlmRole::Assistant, response.content.clone())
                    .with_tool_calls(tool_calls.clone()),
            );

            // The transcript keeps the calls so later turns can replay each
            // tool result paired with the call that produced it.
            let recorded = tool_calls
                .iter()
                .map(|call| ToolCall {
                    id: call.id.clone(),
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                })
                .collect();
            if session.record_tool_calls(ticket, &response.content, recorded)
                == Applied::Superseded
            {
                return Ok(events);
            }

            for call in tool_calls {
                events.push(TurnEvent::ToolCall {
                    name: call.name.clone(),
                });

                let payload = match self.execute_call(session, ticket, &call) {
                    Execution::Superseded => return Ok(events),
                    Execution::Payload(payload) => {
                        events.push(TurnEvent::ToolResult {
                            name: call.name.clone(),
                            payload: payload.clone(),
                        });
                        payload
                    }
                    Execution::Notice(notice) => {
                        warn!(tool = %call.name, notice = %notice, "Tool call failed");
                        events.push(TurnEvent::Notice(notice.clone()));
                        let payload = serde_json::json!({ "error": notice });
                        session.record_tool_error(ticket, &call.id, &payload.to_string());
                        payload
                    }
                };

                context.push(
                    LlmMessage::new(LlmRole::Tool, trim_payload(&payload).to_string())
                        .with_tool_call_id(call.id.clone()),
                );
            }
        }

        session.abort_request(ticket);
        Err(AgentError::MaxIterationsReached(MAX_ITERATIONS))
    }

    fn execute_call(
        &self,
        session: &mut SessionState,
        ticket: &RequestTicket,
        call: &LlmToolCall,
    ) -> Execution {
        let invocation = match ToolInvocation::from_raw(&call.name, &call.arguments) {
            Ok(invocation) => invocation,
            Err(err) => return Execution::Notice(err.to_string()),
        };

        let result = match dispatch(&invocation, session.catalog(), self.stats.as_ref()) {
            Ok(result) => result,
            Err(err @ ToolError::NotFound(_)) => {
                // Unknown tools are a notice, never a turn failure
                return Execution::Notice(err.to_string());
            }
            Err(err) => return Execution::Notice(err.to_string()),
        };

        match session.apply_outcome(ticket, &call.id, &result) {
            Ok(Applied::Accepted) => Execution::Payload(result.to_wire_json()),
            Ok(Applied::Superseded) => Execution::Superseded,
            Err(err) => Execution::Notice(err.to_string()),
        }
    }
}

enum Execution {
    Payload(Value),
    Notice(String),
    Superseded,
}
