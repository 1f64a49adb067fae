//! Built-in tool catalog and icon map
//!
//! The fixed set of tools the assistant model may invoke, including the
//! skill orchestration pair (`set_skill`, `create_skill`) and the
//! analytics tools the Spotlight panel surfaces. The catalog is immutable
//! and process-wide; session extensions live in the registry.

use crate::tools::types::ToolDefinition;
use serde_json::json;
use std::sync::LazyLock;

/// Icon/label pair used by the Tool Library grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconInfo {
    pub icon: String,
    pub label: String,
}

static BUILTIN_TOOLS: LazyLock<Vec<ToolDefinition>> = LazyLock::new(|| {
    vec![
        ToolDefinition::new(
            "set_skill",
            "Switch the active skill/persona. The skill's system prompt then governs the assistant's behavior.",
            json!({
                "type": "object",
                "properties": {
                    "skill": {
                        "type": "string",
                        "description": "Identifier of the skill to activate"
                    }
                },
                "required": ["skill"]
            }),
        ),
        ToolDefinition::new(
            "create_skill",
            "Creates a new custom skill/persona. Use this when the user asks you to create a new skill, after you have gathered enough context (asking clarifying questions if necessary).",
            json!({
                "type": "object",
                "properties": {
                    "title": {
                        "type": "string",
                        "description": "A short name for the skill (e.g. 'Data Scientist')"
                    },
                    "description": {
                        "type": "string",
                        "description": "1-2 sentence summary of what the skill does"
                    },
                    "system_prompt": {
                        "type": "string",
                        "description": "The full instruction the AI will follow when this skill is active"
                    }
                },
                "required": ["title", "description", "system_prompt"]
            }),
        ),
        ToolDefinition::new(
            "get_top_songs",
            "Get the user's top songs/tracks.",
            json!({
                "type": "object",
                "properties": {
                    "period": { "type": "string", "enum": ["Daily", "Weekly", "Monthly", "All Time"] },
                    "limit": { "type": "number" },
                    "artist_filter": { "type": "string" }
                },
                "required": ["period"]
            }),
        ),
        ToolDefinition::new(
            "get_top_artists",
            "Get the user's top artists.",
            json!({
                "type": "object",
                "properties": {
                    "period": { "type": "string", "enum": ["Daily", "Weekly", "Monthly", "All Time"] },
                    "limit": { "type": "number" }
                },
                "required": ["period"]
            }),
        ),
        ToolDefinition::new(
            "get_top_albums",
            "Get the user's top albums.",
            json!({
                "type": "object",
                "properties": {
                    "period": { "type": "string", "enum": ["Daily", "Weekly", "Monthly", "All Time"] },
                    "limit": { "type": "number" }
                },
                "required": ["period"]
            }),
        ),
        ToolDefinition::new(
            "get_listening_time",
            "Get the user's total listening time and stats.",
            json!({
                "type": "object",
                "properties": {
                    "period": { "type": "string", "enum": ["Daily", "Weekly", "Monthly", "All Time"] }
                },
                "required": ["period"]
            }),
        ),
        ToolDefinition::new(
            "get_charts",
            "Get the current music charts showing trending songs.",
            json!({
                "type": "object",
                "properties": {
                    "period": { "type": "string", "enum": ["daily", "weekly", "monthly", "all time"] }
                },
                "required": ["period"]
            }),
        ),
        ToolDefinition::new(
            "get_recent_plays",
            "Get the user's most recently played tracks.",
            json!({
                "type": "object",
                "properties": {
                    "limit": { "type": "number" }
                },
                "required": []
            }),
        ),
        ToolDefinition::new(
            "search_tracks",
            "Search tracks by keyword.",
            json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string" },
                    "limit": { "type": "number" }
                },
                "required": ["query"]
            }),
        ),
    ]
});

/// The immutable built-in tool catalog, in display order
pub fn definitions() -> &'static [ToolDefinition] {
    &BUILTIN_TOOLS
}

/// Returns the icon/label pair for a tool name
///
/// Unknown names fall back to a generic pair instead of erroring so that
/// tools the map has never heard of still render in the library.
pub fn lookup_icon(name: &str) -> IconInfo {
    let registered = match name {
        "set_skill" => Some(("UserCog", "Set Skill")),
        "create_skill" => Some(("UserCog", "Create Skill")),
        "get_top_songs" => Some(("Music", "Top Songs")),
        "get_top_artists" => Some(("Mic2", "Top Artists")),
        "get_top_albums" => Some(("Disc", "Top Albums")),
        "get_listening_time" => Some(("Clock", "Listening Time")),
        "get_charts" => Some(("BarChart2", "Charts")),
        "get_recent_plays" => Some(("History", "Recent Plays")),
        "search_tracks" => Some(("Search", "Track Search")),
        _ => None,
    };

    match registered {
        Some((icon, label)) => IconInfo {
            icon: icon.to_string(),
            label: label.to_string(),
        },
        None => IconInfo {
            icon: "Zap".to_string(),
            label: name.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_tools_present() {
        let names: Vec<&str> = definitions().iter().map(|d| d.name.as_str()).collect();
        assert!(names.contains(&"set_skill"));
        assert!(names.contains(&"create_skill"));
    }

    #[test]
    fn test_set_skill_schema() {
        let def = definitions()
            .iter()
            .find(|d| d.name == "set_skill")
            .unwrap();
        let required = def.parameters["required"].as_array().unwrap();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "skill");
    }

    #[test]
    fn test_create_skill_schema() {
        let def = definitions()
            .iter()
            .find(|d| d.name == "create_skill")
            .unwrap();
        let required = def.parameters["required"].as_array().unwrap();
        assert_eq!(required.len(), 3);
        for field in ["title", "description", "system_prompt"] {
            assert!(required.iter().any(|r| r == field));
            assert!(def.parameters["properties"][field].is_object());
        }
    }

    #[test]
    fn test_required_params_all_declared() {
        // Every required entry must exist under properties
        for def in definitions() {
            let props = def.parameters["properties"].as_object().unwrap();
            for req in def.parameters["required"].as_array().unwrap() {
                let field = req.as_str().unwrap();
                assert!(
                    props.contains_key(field),
                    "tool {} requires undeclared parameter {}",
                    def.name,
                    field
                );
            }
        }
    }

    #[test]
    fn test_names_unique() {
        let mut names: Vec<&str> = definitions().iter().map(|d| d.name.as_str()).collect();
        let before = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn test_lookup_icon_registered() {
        let info = lookup_icon("get_top_songs");
        assert_eq!(info.icon, "Music");
        assert_eq!(info.label, "Top Songs");

        let info = lookup_icon("set_skill");
        assert_eq!(info.icon, "UserCog");
        assert_eq!(info.label, "Set Skill");
    }

    #[test]
    fn test_lookup_icon_fallback() {
        let info = lookup_icon("totally_unknown_tool");
        assert_eq!(info.icon, "Zap");
        assert_eq!(info.label, "totally_unknown_tool");

        let info = lookup_icon("");
        assert_eq!(info.icon, "Zap");
        assert_eq!(info.label, "");
    }
}
