//! OpenAI chat-completions client.
//!
//! Implements the `ChatClient` trait against the OpenAI
//! `/v1/chat/completions` endpoint with SSE streaming.

mod api;
mod client;
mod config;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;
