//! Skill activation state machine
//!
//! Two states: no skill selected, or exactly one active skill. The only
//! transition is a validated `skill_set` outcome; a failed validation
//! leaves the current state untouched. There is no deselect transition,
//! switching skills means activating a different one.

use thiserror::Error;
use tracing::info;

use crate::tools::registry::ToolCatalog;

/// Error types for skill transitions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkillError {
    #[error("Skill not found: {0}")]
    SkillNotFound(String),
}

/// Which skill, if any, is active for the session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SkillState {
    #[default]
    NoSkillSelected,
    SkillActive(String),
}

impl SkillState {
    /// The active skill id, if one is selected
    pub fn active_id(&self) -> Option<&str> {
        match self {
            SkillState::NoSkillSelected => None,
            SkillState::SkillActive(id) => Some(id),
        }
    }

    /// Applies a `skill_set` outcome, validated against the catalog
    ///
    /// On an unknown id the state is unchanged and the caller gets
    /// `SkillError::SkillNotFound` to surface as a notice.
    pub fn apply_skill_set(
        &mut self,
        skill_id: &str,
        catalog: &ToolCatalog,
    ) -> Result<(), SkillError> {
        if !catalog.contains_skill(skill_id) {
            return Err(SkillError::SkillNotFound(skill_id.to_string()));
        }

        info!(skill = %skill_id, "Skill activated");
        *self = SkillState::SkillActive(skill_id.to_string());
        Ok(())
    }

    /// Resolves the active skill's prompt overlay, if any
    pub fn active_prompt<'a>(&self, catalog: &'a ToolCatalog) -> Option<&'a str> {
        self.active_id()
            .and_then(|id| catalog.skill_system_prompt(id))
    }
}
