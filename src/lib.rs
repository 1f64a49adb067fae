//! Lotus: a music listening assistant with tool-calling skills
//!
//! The crate is organized around one chat session at a time:
//! - [`tools`] holds the built-in tool catalog, custom tools, and the
//!   dispatcher that routes model tool calls to handlers.
//! - [`skills`] is the activation state machine for prompt overlays.
//! - [`session`] owns the transcript, the catalog, and the single
//!   in-flight-request gate with supersede semantics.
//! - [`providers`] talks to the Mistral API.
//! - [`agent`] drives the model/tool loop for one turn.
//! - [`library`] renders the tool browser rows.

pub mod agent;
pub mod cli;
pub mod config;
pub mod library;
pub mod providers;
pub mod session;
pub mod skills;
pub mod tools;
