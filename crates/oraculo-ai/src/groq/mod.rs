//! Groq chat-completions client.
//!
//! Groq serves an OpenAI-compatible API at `api.groq.com/openai/v1`;
//! the only divergences handled here are the endpoint and the
//! streaming usage report (delivered under `x_groq.usage`).

mod api;
mod client;
mod config;

pub use client::GroqClient;
pub use config::GroqConfig;
