//! Conversation context assembly
//!
//! Builds the message list sent to the provider: the base system prompt,
//! the active skill's overlay if one is selected, then the session
//! transcript translated into wire roles.

use crate::providers::{LlmMessage, LlmRole, LlmToolCall, trim_payload};
use crate::session::SessionState;

/// Base system prompt for the assistant persona
pub const SYSTEM_PROMPT: &str = "You are Lotus, a music listening assistant. \
You answer questions about the listener's habits: top songs, artists and \
albums, listening time, charts, and recent plays. Use the provided tools \
whenever a question needs real data instead of guessing. Keep answers \
conversational and grounded in the numbers the tools return. You can also \
activate a skill with set_skill or define a new one with create_skill when \
the listener asks for a different mode of answering.";

/// Builds the LLM context from the session
pub fn build_context(session: &SessionState) -> Vec<LlmMessage> {
    let mut system = SYSTEM_PROMPT.to_string();
    if let Some(overlay) = session.skill().active_prompt(session.catalog()) {
        system.push_str("\n\nActive skill:\n");
        system.push_str(overlay);
    }

    let mut context = vec![LlmMessage::new(LlmRole::System, system)];

    for message in session.transcript().messages() {
        let llm = if message.is_user() {
            LlmMessage::new(LlmRole::User, message.content.clone())
        } else if message.is_tool_result() {
            // Tool messages must carry the id of the call that produced
            // them or chat-completions endpoints reject the request.
            let mut llm = LlmMessage::new(LlmRole::Tool, trimmed_content(&message.content));
            if let Some(id) = &message.tool_call_id {
                llm = llm.with_tool_call_id(id.clone());
            }
            llm
        } else {
            let mut llm = LlmMessage::new(LlmRole::Assistant, message.content.clone());
            if let Some(calls) = &message.tool_calls {
                llm = llm.with_tool_calls(
                    calls
                        .iter()
                        .map(|c| LlmToolCall::new(c.id.clone(), c.name.clone(), c.arguments.clone()))
                        .collect(),
                );
            }
            llm
        };
        context.push(llm);
    }

    context
}

/// Replayed tool payloads get the same trim as live ones
fn trimmed_content(content: &str) -> String {
    match serde_json::from_str(content) {
        Ok(value) => trim_payload(&value).to_string(),
        Err(_) => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;
    use crate::tools::dispatch::ToolCallResult;

    #[test]
    fn test_context_starts_with_system_prompt() {
        let session = SessionState::new();
        let context = build_context(&session);

        assert_eq!(context.len(), 1);
        assert_eq!(context[0].role, LlmRole::System);
        assert!(context[0].content.contains("Lotus"));
    }

    #[test]
    fn test_context_includes_transcript() {
        let mut session = SessionState::new();
        let ticket = session.begin_request("What did I play most?").unwrap();
        session.finish_request(&ticket, "The Weeknd, by a mile.");

        let context = build_context(&session);
        assert_eq!(context.len(), 3);
        assert_eq!(context[1].role, LlmRole::User);
        assert_eq!(context[2].role, LlmRole::Assistant);
    }

    #[test]
    fn test_active_skill_overlays_system_prompt() {
        let mut session = SessionState::new();
        let ticket = session.begin_request("be an analyst").unwrap();
        session
            .apply_outcome(
                &ticket,
                "call_1",
                &ToolCallResult::SkillSet {
                    skill: "analyst".to_string(),
                },
            )
            .unwrap();

        let context = build_context(&session);
        assert!(context[0].content.contains("Active skill:"));
        assert!(context[0].content.contains("concrete figures"));
    }

    #[test]
    fn test_replayed_tool_exchange_stays_paired() {
        use crate::session::ToolCall;
        use serde_json::json;

        let mut session = SessionState::new();
        let ticket = session.begin_request("what did I just play?").unwrap();
        session.record_tool_calls(
            &ticket,
            "",
            vec![ToolCall {
                id: "call_1".to_string(),
                name: "get_recent_plays".to_string(),
                arguments: "{}".to_string(),
            }],
        );
        session
            .apply_outcome(
                &ticket,
                "call_1",
                &ToolCallResult::Data(json!({ "plays": [] })),
            )
            .unwrap();
        session.finish_request(&ticket, "You just played SZA.");
        session.begin_request("and before that?").unwrap();

        let context = build_context(&session);

        // Every tool message carries its call id and follows an assistant
        // message that issued that call.
        for (i, message) in context.iter().enumerate() {
            if message.role != LlmRole::Tool {
                continue;
            }
            let id = message.tool_call_id.as_deref().unwrap();
            let issued = context[..i].iter().rev().find_map(|m| m.tool_calls.as_ref());
            assert!(
                issued
                    .unwrap()
                    .iter()
                    .any(|c| c.id == id && c.name == "get_recent_plays")
            );
        }
        assert!(context.iter().any(|m| m.role == LlmRole::Tool));
        assert!(
            context
                .iter()
                .any(|m| m.tool_calls.as_ref().is_some_and(|c| !c.is_empty()))
        );
    }

    #[test]
    fn test_replayed_tool_payloads_are_trimmed() {
        use serde_json::json;

        let mut session = SessionState::new();
        let ticket = session.begin_request("lots of rows").unwrap();
        let rows: Vec<u32> = (0..20).collect();
        session
            .apply_outcome(&ticket, "call_1", &ToolCallResult::Data(json!({ "rows": rows })))
            .unwrap();

        let context = build_context(&session);
        let tool = context.iter().find(|m| m.role == LlmRole::Tool).unwrap();
        let value: serde_json::Value = serde_json::from_str(&tool.content).unwrap();
        assert_eq!(value["rows"].as_array().map(|a| a.len()), Some(8));
    }

    #[test]
    fn test_no_overlay_without_selection() {
        let session = SessionState::new();
        let context = build_context(&session);
        assert!(!context[0].content.contains("Active skill:"));
    }
}
