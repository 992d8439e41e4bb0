//! Chat engine for Oráculo.
//!
//! Provides OpenAI and Groq chat-completion clients with:
//! - Streaming (SSE) support
//! - Conversation sessions with in-memory history
//! - Token usage tracking
//! - A provider registry (model catalogs, API key env vars)

pub mod groq;
pub mod openai;
pub mod provider;
pub mod session;
pub mod streaming;
pub mod token_tracker;
mod wire;

use async_trait::async_trait;

pub use groq::{GroqClient, GroqConfig};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use provider::Provider;
pub use session::Session;
pub use token_tracker::TokenTracker;

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn send_message(&self, messages: &[Message]) -> Result<ChatResponse, AiError>;

    async fn send_message_streaming(
        &self,
        messages: &[Message],
        on_chunk: Box<dyn Fn(String) + Send + Sync>,
    ) -> Result<ChatResponse, AiError>;
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Wire name in the chat-completions message schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Session is busy with another request")]
    Busy,
}
