//! Conversation session management.
//!
//! A `Session` holds the conversation history (messages) and drives
//! each turn through a `ChatClient`, streamed or not.

mod chat;
mod manager;
mod types;

pub use manager::Session;
