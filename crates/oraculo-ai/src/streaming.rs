//! Server-Sent Events (SSE) parsing for chat-completion streams.
//!
//! OpenAI and Groq both stream responses as SSE: a sequence of
//! `data: <json>` lines separated by blank lines, terminated by a
//! literal `data: [DONE]` sentinel. This module frames the byte stream
//! into events and extracts the per-chunk delta text.

use futures_util::StreamExt;
use tokio::io::AsyncBufReadExt;
use tokio_util::io::StreamReader;

/// Sentinel payload marking end-of-stream in chat-completion SSE.
pub const DONE_SENTINEL: &str = "[DONE]";

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone)]
pub struct SseEvent {
    /// The event data (JSON string, or the `[DONE]` sentinel).
    pub data: String,
}

impl SseEvent {
    pub fn is_done(&self) -> bool {
        self.data.trim() == DONE_SENTINEL
    }
}

/// Parse an SSE stream from a reqwest response, calling `on_event` for
/// each data event. Stops once the `[DONE]` sentinel is seen (the
/// sentinel itself is not delivered to the callback).
pub async fn parse_sse_stream(
    response: reqwest::Response,
    mut on_event: impl FnMut(SseEvent),
) -> Result<(), crate::AiError> {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));
    let mut lines = reader.lines();

    let mut current_data = String::new();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| crate::AiError::NetworkError(e.to_string()))?
    {
        if line.is_empty() {
            // Empty line = end of event
            if !current_data.is_empty() {
                let event = SseEvent {
                    data: std::mem::take(&mut current_data),
                };
                if event.is_done() {
                    return Ok(());
                }
                on_event(event);
            }
            continue;
        }

        if let Some(data) = line.strip_prefix("data: ") {
            if !current_data.is_empty() {
                current_data.push('\n');
            }
            current_data.push_str(data);
        }
        // Ignore other fields (event:, id:, retry:, comments)
    }

    // Flush any remaining event
    if !current_data.is_empty() {
        let event = SseEvent { data: current_data };
        if !event.is_done() {
            on_event(event);
        }
    }

    Ok(())
}

/// Extract the streamed text delta from a chat-completion chunk, if any.
///
/// Chunks look like `{"choices":[{"delta":{"content":"..."}}], ...}`;
/// role-only and finish chunks carry no content.
pub fn delta_content(chunk: &serde_json::Value) -> Option<&str> {
    chunk["choices"][0]["delta"]["content"].as_str()
}

/// Extract token usage from a chunk or final response body, if present.
pub fn parse_usage(body: &serde_json::Value) -> Option<crate::TokenUsage> {
    let usage = body.get("usage")?;
    if usage.is_null() {
        return None;
    }
    Some(crate::TokenUsage {
        prompt_tokens: usage["prompt_tokens"].as_u64().unwrap_or(0),
        completion_tokens: usage["completion_tokens"].as_u64().unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_content_reads_chunk() {
        let chunk: serde_json::Value = serde_json::from_str(
            r#"{"choices":[{"delta":{"content":"Olá"},"index":0}]}"#,
        )
        .unwrap();
        assert_eq!(delta_content(&chunk), Some("Olá"));
    }

    #[test]
    fn delta_content_ignores_role_only_chunk() {
        let chunk: serde_json::Value =
            serde_json::from_str(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#).unwrap();
        assert_eq!(delta_content(&chunk), None);
    }

    #[test]
    fn done_sentinel_detected() {
        let event = SseEvent {
            data: "[DONE]".into(),
        };
        assert!(event.is_done());

        let event = SseEvent {
            data: r#"{"choices":[]}"#.into(),
        };
        assert!(!event.is_done());
    }

    #[test]
    fn parse_usage_reads_counts() {
        let body: serde_json::Value = serde_json::from_str(
            r#"{"usage":{"prompt_tokens":12,"completion_tokens":34,"total_tokens":46}}"#,
        )
        .unwrap();
        let usage = parse_usage(&body).unwrap();
        assert_eq!(usage.prompt_tokens, 12);
        assert_eq!(usage.completion_tokens, 34);
        assert_eq!(usage.total_tokens(), 46);
    }

    #[test]
    fn parse_usage_absent_or_null() {
        let body: serde_json::Value = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(parse_usage(&body).is_none());

        let body: serde_json::Value = serde_json::from_str(r#"{"usage":null}"#).unwrap();
        assert!(parse_usage(&body).is_none());
    }
}
