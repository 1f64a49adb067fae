//! Tool library listing
//!
//! Produces the display rows for the tool browser: icon and label
//! resolution, a short parameter preview, and the `@tool` token inserted
//! into the composer when an entry is picked.

use serde::Serialize;

use crate::tools::builtin::lookup_icon;
use crate::tools::registry::ToolCatalog;
use crate::tools::types::CatalogTool;

const PARAM_PREVIEW_LIMIT: usize = 3;

/// A display row for one catalog tool
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LibraryEntry {
    pub name: String,
    pub label: String,
    pub icon: String,
    pub description: String,
    /// Up to three parameter names
    pub parameters: Vec<String>,
    /// How many parameters the preview left out
    pub overflow: usize,
    pub is_custom: bool,
}

impl LibraryEntry {
    fn from_tool(tool: &CatalogTool<'_>) -> Self {
        let info = lookup_icon(tool.name());
        let mut parameters = tool.parameter_names();
        let overflow = parameters.len().saturating_sub(PARAM_PREVIEW_LIMIT);
        parameters.truncate(PARAM_PREVIEW_LIMIT);

        Self {
            name: tool.name().to_string(),
            label: info.label,
            icon: info.icon,
            description: tool.description().to_string(),
            parameters,
            overflow,
            is_custom: tool.is_custom(),
        }
    }

    /// Parameter preview string, e.g. `period, limit` or `a, b, c +2 more`
    pub fn parameter_preview(&self) -> String {
        let base = self.parameters.join(", ");
        if self.overflow > 0 {
            format!("{} +{} more", base, self.overflow)
        } else {
            base
        }
    }
}

/// Lists catalog tools as display rows, filtered by `query`
///
/// An empty query lists everything, built-ins first, in catalog order.
pub fn library_entries(catalog: &ToolCatalog, query: &str) -> Vec<LibraryEntry> {
    catalog
        .filter_tools(query)
        .iter()
        .map(LibraryEntry::from_tool)
        .collect()
}

/// The composer token inserted when a tool is selected
pub fn selection_token(name: &str) -> String {
    format!("@tool {} ", name)
}
