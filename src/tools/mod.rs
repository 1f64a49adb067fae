pub mod builtin;
pub mod dispatch;
pub mod registry;
pub mod stats;
pub mod types;

pub use builtin::{IconInfo, lookup_icon};
pub use dispatch::{ToolCallResult, ToolInvocation, dispatch};
pub use registry::{RegistryError, ToolCatalog};
pub use stats::{MemoryStats, StatsSource};
pub use types::{CatalogTool, CustomTool, ToolDefinition, ToolError, ToolResult};
