//! ChatClient trait implementation for OpenAiClient (send_message + streaming).

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::streaming::{delta_content, parse_sse_stream, parse_usage, SseEvent};
use crate::wire::{build_request_body, parse_response, status_error};
use crate::{AiError, ChatClient, ChatResponse, Message, TokenUsage};

use super::client::OpenAiClient;

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn send_message(&self, messages: &[Message]) -> Result<ChatResponse, AiError> {
        let body = build_request_body(&self.config.model, self.config.temperature, messages, false);

        debug!(model = %self.config.model, "OpenAI API request");

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
        let mut body =
            build_request_body(&self.config.model, self.config.temperature, messages, true);
        // Ask for a final usage chunk; without this OpenAI omits usage when streaming.
        body["stream_options"] = serde_json::json!({ "include_usage": true });

        debug!(model = %self.config.model, "OpenAI API streaming request");

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

            if let Some(u) = parse_usage(&chunk) {
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
