//! Per-session state: transcript, tool catalog, skill, and request gate
//!
//! A session runs at most one request at a time. Each request is tagged
//! with a generation number; a superseding request bumps the generation,
//! and outcomes carrying a stale ticket are dropped without touching
//! state.

use thiserror::Error;
use tracing::{debug, info};

use crate::session::types::{Message, ToolCall, Transcript};
use crate::skills::state::{SkillError, SkillState};
use crate::tools::dispatch::ToolCallResult;
use crate::tools::registry::{RegistryError, ToolCatalog};
use crate::tools::types::CustomTool;

/// Error types for session operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("A request is already in flight for this session")]
    RequestInFlight,

    #[error(transparent)]
    Skill(#[from] SkillError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Proof that a request was started; carries its generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
}

/// Whether an outcome was applied or dropped as superseded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Accepted,
    Superseded,
}

/// All mutable state for one chat session
#[derive(Debug, Default)]
pub struct SessionState {
    transcript: Transcript,
    catalog: ToolCatalog,
    skill: SkillState,
    generation: u64,
    in_flight: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    pub fn skill(&self) -> &SkillState {
        &self.skill
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Starts a request, recording the user message
    ///
    /// Fails if one is already in flight; use [`supersede`](Self::supersede)
    /// to replace the running request instead.
    pub fn begin_request(&mut self, user_text: &str) -> Result<RequestTicket, SessionError> {
        if self.in_flight {
            return Err(SessionError::RequestInFlight);
        }
        Ok(self.start(user_text))
    }

    /// Starts a request, cancelling any in-flight one
    ///
    /// The superseded request's outcomes become stale: their ticket no
    /// longer matches the session generation.
    pub fn supersede(&mut self, user_text: &str) -> RequestTicket {
        if self.in_flight {
            debug!(generation = self.generation, "Superseding in-flight request");
        }
        self.start(user_text)
    }

    fn start(&mut self, user_text: &str) -> RequestTicket {
        self.generation += 1;
        self.in_flight = true;
        self.transcript.push(Message::user(user_text));
        RequestTicket {
            generation: self.generation,
        }
    }

    fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.in_flight && ticket.generation == self.generation
    }

    /// Records the assistant message carrying the model's tool calls
    ///
    /// Stale tickets change nothing. The transcript keeps the calls so a
    /// later context rebuild can pair each tool result with the call that
    /// produced it.
    pub fn record_tool_calls(
        &mut self,
        ticket: &RequestTicket,
        content: &str,
        calls: Vec<ToolCall>,
    ) -> Applied {
        if !self.is_current(ticket) {
            return Applied::Superseded;
        }
        self.transcript
            .push(Message::assistant(content).with_tool_calls(calls));
        Applied::Accepted
    }

    /// Records a failed tool call's error payload under its call id
    pub fn record_tool_error(
        &mut self,
        ticket: &RequestTicket,
        call_id: &str,
        content: &str,
    ) -> Applied {
        if !self.is_current(ticket) {
            return Applied::Superseded;
        }
        self.transcript.push(Message::tool_result(content, call_id));
        Applied::Accepted
    }

    /// Applies one tool call outcome produced under `ticket`
    ///
    /// Stale tickets are dropped silently. `skill_set` is validated here:
    /// the dispatcher passes ids through unchecked, and an unknown id
    /// fails without changing the active skill. `skill_created` appends
    /// the new custom tool as one whole entry.
    pub fn apply_outcome(
        &mut self,
        ticket: &RequestTicket,
        call_id: &str,
        result: &ToolCallResult,
    ) -> Result<Applied, SessionError> {
        if !self.is_current(ticket) {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                "Dropping outcome from superseded request"
            );
            return Ok(Applied::Superseded);
        }

        match result {
            ToolCallResult::SkillSet { skill } => {
                self.skill.apply_skill_set(skill, &self.catalog)?;
            }
            ToolCallResult::SkillCreated {
                title,
                description,
                system_prompt,
            } => {
                let tool = CustomTool::from_created(title, description, system_prompt);
                info!(tool = %tool.name, "Registering custom tool");
                self.catalog.add_custom(tool)?;
            }
            ToolCallResult::Data(_) => {}
        }

        self.transcript.push(Message::tool_result(
            result.to_wire_json().to_string(),
            call_id,
        ));
        Ok(Applied::Accepted)
    }

    /// Records the final assistant message and releases the gate
    ///
    /// A stale ticket changes nothing; the superseding request owns the
    /// transcript now.
    pub fn finish_request(&mut self, ticket: &RequestTicket, assistant_text: &str) -> Applied {
        if !self.is_current(ticket) {
            return Applied::Superseded;
        }

        self.transcript.push(Message::assistant(assistant_text));
        self.in_flight = false;
        Applied::Accepted
    }

    /// Releases the gate without a final message, for failed requests
    pub fn abort_request(&mut self, ticket: &RequestTicket) {
        if self.is_current(ticket) {
            self.in_flight = false;
        }
    }
}
