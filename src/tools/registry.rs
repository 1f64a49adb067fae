//! Session-scoped tool catalog
//!
//! Merges the immutable built-in set with the session's custom tools.
//! Customs are appended whole through a single method; the render path can
//! read the catalog while a turn extends it, because extension is an
//! atomic whole-entry append.

use crate::skills::profiles;
use crate::tools::builtin;
use crate::tools::types::{CatalogTool, CustomTool, ToolDefinition};
use serde_json::Value;
use thiserror::Error;

/// Error types for catalog mutation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// Name collides with a built-in or an existing custom tool
    #[error("A tool named '{0}' already exists")]
    DuplicateName(String),
}

/// The merged built-in + custom tool catalog for one session
///
/// Built-ins are process-wide and read-only; custom tools are owned here
/// and accumulate append-only over the session.
#[derive(Debug, Default)]
pub struct ToolCatalog {
    custom: Vec<CustomTool>,
}

impl ToolCatalog {
    /// Creates a catalog containing only the built-ins
    pub fn new() -> Self {
        Self { custom: Vec::new() }
    }

    /// The built-in definitions, in display order
    pub fn builtins(&self) -> &'static [ToolDefinition] {
        builtin::definitions()
    }

    /// The session's custom tools, in creation order
    pub fn customs(&self) -> &[CustomTool] {
        &self.custom
    }

    /// All tools in display order: built-ins first, then customs
    ///
    /// No deduplication is performed at display time; whatever the catalog
    /// holds is what the library lists.
    pub fn all_tools(&self) -> Vec<CatalogTool<'_>> {
        self.builtins()
            .iter()
            .map(CatalogTool::BuiltIn)
            .chain(self.custom.iter().map(CatalogTool::Custom))
            .collect()
    }

    /// Case-insensitive substring filter over name and description
    ///
    /// An empty query returns the full catalog unchanged; matching
    /// preserves display order.
    pub fn filter_tools(&self, query: &str) -> Vec<CatalogTool<'_>> {
        let all = self.all_tools();
        if query.is_empty() {
            return all;
        }

        let needle = query.to_lowercase();
        all.into_iter()
            .filter(|tool| {
                tool.name().to_lowercase().contains(&needle)
                    || tool.description().to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Looks up a tool by name, built-ins taking precedence in lookup order
    pub fn get(&self, name: &str) -> Option<CatalogTool<'_>> {
        self.all_tools().into_iter().find(|t| t.name() == name)
    }

    /// Appends a custom tool to the session catalog
    ///
    /// The single mutation path. A name that collides with a built-in or
    /// an existing custom is rejected so the uniqueness invariant holds at
    /// creation time.
    pub fn add_custom(&mut self, tool: CustomTool) -> Result<(), RegistryError> {
        if self.get(&tool.name).is_some() {
            return Err(RegistryError::DuplicateName(tool.name));
        }

        tracing::info!(tool = %tool.name, "Custom tool added to session catalog");
        self.custom.push(tool);
        Ok(())
    }

    /// True if `id` names a built-in skill profile or a custom tool
    ///
    /// This is the lookup the skill state machine validates `skill_set`
    /// results against.
    pub fn contains_skill(&self, id: &str) -> bool {
        profiles::builtin_skills().iter().any(|p| p.id == id)
            || self.custom.iter().any(|t| t.name == id)
    }

    /// Resolves a skill identifier to its system prompt
    pub fn skill_system_prompt(&self, id: &str) -> Option<&str> {
        profiles::builtin_skills()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.system_prompt)
            .or_else(|| {
                self.custom
                    .iter()
                    .find(|t| t.name == id)
                    .map(|t| t.system_prompt.as_str())
            })
    }

    /// Serializes the merged catalog for the provider's tool parameter
    pub fn wire_definitions(&self) -> Vec<Value> {
        self.all_tools().iter().map(|t| t.to_wire_format()).collect()
    }
}
