//! Tool call dispatch
//!
//! Routes a parsed tool call to its handler. Handlers are pure with
//! respect to session state: `set_skill` and `create_skill` return a
//! structured outcome and the caller decides what to apply, while the
//! analytics tools read from a [`StatsSource`].

use std::collections::HashMap;

use serde_json::{Value, json};
use tracing::debug;

use crate::tools::registry::ToolCatalog;
use crate::tools::stats::{StatsSource, ranked_json};
use crate::tools::types::{ToolError, ToolResult, require_str, validate_args};

/// A parsed tool call, ready for dispatch
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: HashMap<String, Value>,
}

impl ToolInvocation {
    pub fn new(name: impl Into<String>, arguments: HashMap<String, Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Parses the raw arguments string an LLM emits alongside a tool call
    pub fn from_raw(name: &str, raw_arguments: &str) -> ToolResult<Self> {
        let arguments: HashMap<String, Value> =
            serde_json::from_str(raw_arguments).map_err(|e| ToolError::InvalidArguments {
                tool: name.to_string(),
                message: format!("Arguments are not a JSON object: {}", e),
            })?;
        Ok(Self::new(name, arguments))
    }
}

/// Structured outcome of a dispatched tool call
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCallResult {
    /// `set_skill` asked to activate a skill. The requested id is passed
    /// through as-is; existence is checked when the session applies it.
    SkillSet { skill: String },
    /// `create_skill` echoed back the fields for a new custom skill.
    /// Nothing is registered until the session accepts the outcome.
    SkillCreated {
        title: String,
        description: String,
        system_prompt: String,
    },
    /// An analytics tool produced a data payload.
    Data(Value),
}

impl ToolCallResult {
    /// Renders the outcome in the wire shape sent back to the model
    pub fn to_wire_json(&self) -> Value {
        match self {
            ToolCallResult::SkillSet { skill } => json!({
                "status": "skill_set",
                "skill": skill,
            }),
            ToolCallResult::SkillCreated {
                title,
                description,
                system_prompt,
            } => json!({
                "status": "skill_created",
                "title": title,
                "description": description,
                "system_prompt": system_prompt,
            }),
            ToolCallResult::Data(value) => value.clone(),
        }
    }
}

fn period_arg(args: &HashMap<String, Value>) -> &str {
    args.get("period")
        .and_then(|v| v.as_str())
        .unwrap_or("Weekly")
}

fn limit_arg(args: &HashMap<String, Value>, default: usize) -> usize {
    args.get("limit")
        .and_then(|v| v.as_u64())
        .map(|n| n as usize)
        .unwrap_or(default)
}

/// Dispatches a tool invocation against the catalog
///
/// Total over every tool the catalog knows: built-ins are handled here
/// and custom tools acknowledge activation. An unknown name returns
/// `ToolError::NotFound`, which callers treat as a non-fatal notice.
pub fn dispatch(
    invocation: &ToolInvocation,
    catalog: &ToolCatalog,
    stats: &dyn StatsSource,
) -> ToolResult<ToolCallResult> {
    let Some(tool) = catalog.get(&invocation.name) else {
        return Err(ToolError::NotFound(invocation.name.clone()));
    };

    validate_args(&invocation.arguments, tool.parameters(), &invocation.name)?;
    debug!(tool = %invocation.name, "Dispatching tool call");

    let args = &invocation.arguments;
    let result = match invocation.name.as_str() {
        "set_skill" => ToolCallResult::SkillSet {
            skill: require_str(args, "skill", &invocation.name)?.to_string(),
        },
        "create_skill" => ToolCallResult::SkillCreated {
            title: require_str(args, "title", &invocation.name)?.to_string(),
            description: require_str(args, "description", &invocation.name)?.to_string(),
            system_prompt: require_str(args, "system_prompt", &invocation.name)?.to_string(),
        },
        "get_top_songs" => ToolCallResult::Data(json!({
            "period": period_arg(args),
            "songs": ranked_json(&stats.top_songs(period_arg(args), limit_arg(args, 5))),
        })),
        "get_top_artists" => ToolCallResult::Data(json!({
            "period": period_arg(args),
            "artists": ranked_json(&stats.top_artists(period_arg(args), limit_arg(args, 5))),
        })),
        "get_top_albums" => ToolCallResult::Data(json!({
            "period": period_arg(args),
            "albums": ranked_json(&stats.top_albums(period_arg(args), limit_arg(args, 5))),
        })),
        "get_listening_time" => ToolCallResult::Data(json!({
            "period": period_arg(args),
            "minutes": stats.listening_minutes(period_arg(args)),
        })),
        "get_charts" => ToolCallResult::Data(json!({
            "period": period_arg(args),
            "chart": ranked_json(&stats.charts(period_arg(args))),
        })),
        "get_recent_plays" => ToolCallResult::Data(json!({
            "plays": ranked_json(&stats.recent_plays(limit_arg(args, 10))),
        })),
        "search_tracks" => {
            let query = require_str(args, "query", &invocation.name)?;
            ToolCallResult::Data(json!({
                "query": query,
                "results": ranked_json(&stats.search_tracks(query, limit_arg(args, 10))),
            }))
        }
        // A custom tool carries no handler of its own; invoking it
        // activates its system prompt like set_skill does.
        name if tool.is_custom() => ToolCallResult::SkillSet {
            skill: name.to_string(),
        },
        name => {
            return Err(ToolError::ExecutionFailed {
                tool: name.to_string(),
                message: "No handler registered for this tool".to_string(),
            });
        }
    };

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::stats::MemoryStats;
    use crate::tools::types::CustomTool;

    fn args(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn run(name: &str, arguments: HashMap<String, Value>) -> ToolResult<ToolCallResult> {
        let catalog = ToolCatalog::new();
        let stats = MemoryStats::new();
        dispatch(&ToolInvocation::new(name, arguments), &catalog, &stats)
    }

    #[test]
    fn test_unknown_tool_is_not_found() {
        let err = run("no_such_tool", HashMap::new()).unwrap_err();
        assert_eq!(err, ToolError::NotFound("no_such_tool".to_string()));
    }

    #[test]
    fn test_set_skill_passes_id_through_unchecked() {
        // Existence is the session's concern, not the dispatcher's
        let result = run("set_skill", args(&[("skill", json!("does-not-exist"))])).unwrap();
        assert_eq!(
            result,
            ToolCallResult::SkillSet {
                skill: "does-not-exist".to_string()
            }
        );
    }

    #[test]
    fn test_set_skill_requires_skill_argument() {
        let err = run("set_skill", HashMap::new()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
        assert_eq!(err.tool_name(), "set_skill");
    }

    #[test]
    fn test_create_skill_echoes_fields_without_registering() {
        let catalog = ToolCatalog::new();
        let stats = MemoryStats::new();
        let invocation = ToolInvocation::new(
            "create_skill",
            args(&[
                ("title", json!("Night Owl")),
                ("description", json!("Late-night listening analysis")),
                ("system_prompt", json!("Focus on plays after midnight.")),
            ]),
        );

        let result = dispatch(&invocation, &catalog, &stats).unwrap();
        assert_eq!(
            result,
            ToolCallResult::SkillCreated {
                title: "Night Owl".to_string(),
                description: "Late-night listening analysis".to_string(),
                system_prompt: "Focus on plays after midnight.".to_string(),
            }
        );
        // The dispatcher itself never mutates the catalog
        assert!(catalog.customs().is_empty());
    }

    #[test]
    fn test_create_skill_rejects_empty_title() {
        let err = run(
            "create_skill",
            args(&[
                ("title", json!("   ")),
                ("description", json!("d")),
                ("system_prompt", json!("p")),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn test_top_songs_respects_limit() {
        let result = run(
            "get_top_songs",
            args(&[("period", json!("Weekly")), ("limit", json!(2))]),
        )
        .unwrap();
        let ToolCallResult::Data(value) = result else {
            panic!("expected data payload");
        };
        assert_eq!(value["songs"].as_array().map(|a| a.len()), Some(2));
        assert_eq!(value["songs"][0]["rank"], 1);
    }

    #[test]
    fn test_listening_time_defaults_to_weekly() {
        let result = run("get_listening_time", HashMap::new()).unwrap();
        let ToolCallResult::Data(value) = result else {
            panic!("expected data payload");
        };
        assert_eq!(value["period"], "Weekly");
        assert!(value["minutes"].as_u64().is_some());
    }

    #[test]
    fn test_search_tracks_requires_query() {
        let err = run("search_tracks", HashMap::new()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn test_custom_tool_acts_as_skill_activation() {
        let mut catalog = ToolCatalog::new();
        catalog
            .add_custom(CustomTool::from_created(
                "Vinyl Nerd",
                "Deep album lore",
                "You know every pressing.",
            ))
            .unwrap();
        let stats = MemoryStats::new();

        let invocation = ToolInvocation::new("vinyl-nerd", HashMap::new());
        let result = dispatch(&invocation, &catalog, &stats).unwrap();
        assert_eq!(
            result,
            ToolCallResult::SkillSet {
                skill: "vinyl-nerd".to_string()
            }
        );
    }

    #[test]
    fn test_wire_json_shapes() {
        let set = ToolCallResult::SkillSet {
            skill: "default".to_string(),
        };
        assert_eq!(
            set.to_wire_json(),
            json!({ "status": "skill_set", "skill": "default" })
        );

        let created = ToolCallResult::SkillCreated {
            title: "T".to_string(),
            description: "D".to_string(),
            system_prompt: "P".to_string(),
        };
        assert_eq!(created.to_wire_json()["status"], "skill_created");
    }

    #[test]
    fn test_from_raw_rejects_malformed_json() {
        let err = ToolInvocation::from_raw("set_skill", "not json").unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }
}
