pub mod context;
pub mod turn;

pub use context::{SYSTEM_PROMPT, build_context};
pub use turn::{AgentError, MAX_ITERATIONS, SpotlightAgent, TurnEvent};
