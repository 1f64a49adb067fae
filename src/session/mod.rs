pub mod state;
pub mod types;

pub use state::{Applied, RequestTicket, SessionError, SessionState};
pub use types::{Message, ToolCall, Transcript};
