//! Skills: named system-prompt overlays for the assistant
//!
//! Built-in profiles are compiled in; custom skills are session-created
//! through the `create_skill` tool and live in the tool catalog.

pub mod profiles;
pub mod state;

pub use profiles::{SkillProfile, builtin_skills};
pub use state::{SkillError, SkillState};
