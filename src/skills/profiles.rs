//! Built-in skill profiles
//!
//! A skill is a named system-prompt overlay. The built-in set is fixed at
//! compile time; sessions extend it with custom tools created through
//! `create_skill`.

/// A built-in skill: identifier, display label, and prompt overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillProfile {
    pub id: &'static str,
    pub label: &'static str,
    pub system_prompt: &'static str,
}

static BUILTIN_SKILLS: &[SkillProfile] = &[
    SkillProfile {
        id: "default",
        label: "Default",
        system_prompt: "Answer listening questions conversationally, using tools \
            when the question needs real numbers.",
    },
    SkillProfile {
        id: "analyst",
        label: "Analyst",
        system_prompt: "Lead with concrete figures. Compare periods, call out \
            trends, and always cite the play counts behind a claim.",
    },
    SkillProfile {
        id: "curator",
        label: "Curator",
        system_prompt: "Recommend music. Use the listener's top artists and \
            recent plays to suggest what to queue next, and explain each pick \
            in one sentence.",
    },
];

/// Returns the fixed set of built-in skills
pub fn builtin_skills() -> &'static [SkillProfile] {
    BUILTIN_SKILLS
}

/// Looks up a built-in profile by id
pub fn find(id: &str) -> Option<&'static SkillProfile> {
    BUILTIN_SKILLS.iter().find(|p| p.id == id)
}
