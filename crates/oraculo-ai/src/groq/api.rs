//! ChatClient trait implementation for GroqClient (send_message + streaming).

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::streaming::{delta_content, parse_sse_stream, parse_usage, SseEvent};
use crate::wire::{build_request_body, parse_response, status_error};
use crate::{AiError, ChatClient, ChatResponse, Message, TokenUsage};

use super::client::GroqClient;

/// Groq reports streaming usage on the final chunk under `x_groq.usage`.
fn groq_stream_usage(chunk: &serde_json::Value) -> Option<TokenUsage> {
    let usage = chunk.get("x_groq")?.get("usage")?;
    Some(TokenUsage {
        prompt_tokens: usage["prompt_tokens"].as_u64().unwrap_or(0),
        completion_tokens: usage["completion_tokens"].as_u64().unwrap_or(0),
    })
}

#[async_trait]
impl ChatClient for GroqClient {
    async fn send_message(&self, messages: &[Message]) -> Result<ChatResponse, AiError> {
        let body = build_request_body(&self.config.model, self.config.temperature, messages, false);

        debug!(model = %self.config.model, "Groq API request");

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        parse_response(json)
    }

    async fn send_message_streaming(
        &self,
        messages: &[Message],
        on_chunk: Box<dyn Fn(String) + Send + Sync>,
    ) -> Result<ChatResponse, AiError> {
        let body = build_request_body(&self.config.model, self.config.temperature, messages, true);

        debug!(model = %self.config.model, "Groq API streaming request");

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let mut full_content = String::new();
        let mut usage = TokenUsage::default();

        parse_sse_stream(response, |event: SseEvent| {
            let Ok(chunk) = serde_json::from_str::<serde_json::Value>(&event.data) else {
                return;
            };

            if let Some(text) = delta_content(&chunk) {
                full_content.push_str(text);
                on_chunk(text.to_string());
            }

            if let Some(u) = groq_stream_usage(&chunk).or_else(|| parse_usage(&chunk)) {
                usage = u;
            }
        })
        .await?;

        if usage.total_tokens() == 0 {
            warn!("No usage data received in streaming response");
        }

        Ok(ChatResponse {
            content: full_content,
            usage,
        })
    }
}
