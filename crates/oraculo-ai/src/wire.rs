//! Chat-completions wire format shared by OpenAI and Groq.
//!
//! Groq exposes an OpenAI-compatible API, so request bodies and response
//! shapes are identical; only endpoints, auth, and streaming-usage quirks
//! differ (those live in each provider's `api.rs`).

use crate::streaming::parse_usage;
use crate::{AiError, ChatResponse, Message, TokenUsage};

/// Build the JSON request body for a `/chat/completions` call.
pub(crate) fn build_request_body(
    model: &str,
    temperature: f64,
    messages: &[Message],
    stream: bool,
) -> serde_json::Value {
    let msgs: Vec<serde_json::Value> = messages
        .iter()
        .map(|msg| {
            serde_json::json!({
                "role": msg.role.as_str(),
                "content": msg.content,
            })
        })
        .collect();

    let mut body = serde_json::json!({
        "model": model,
        "temperature": temperature,
        "messages": msgs,
    });

    if stream {
        body["stream"] = serde_json::json!(true);
    }

    body
}

/// Parse a non-streaming `/chat/completions` response.
pub(crate) fn parse_response(json: serde_json::Value) -> Result<ChatResponse, AiError> {
    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| AiError::ParseError("response has no message content".into()))?;

    let usage = parse_usage(&json).unwrap_or_else(TokenUsage::default);

    Ok(ChatResponse { content, usage })
}

/// Map an HTTP error status to an `AiError`, truncating the body.
pub(crate) async fn status_error(response: reqwest::Response) -> AiError {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return AiError::RateLimited;
    }
    let text = response.text().await.unwrap_or_default();
    let text = text.chars().take(200).collect::<String>();
    AiError::ApiError(format!("HTTP {status}: {text}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn request_body_carries_roles_in_order() {
        let messages = vec![
            Message::system("seja breve"),
            Message::user("oi"),
            Message::assistant("olá"),
        ];
        let body = build_request_body("gpt-4o-mini", 0.7, &messages, false);

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][2]["role"], "assistant");
        assert_eq!(body["messages"][1]["content"], "oi");
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn request_body_sets_stream_flag() {
        let body = build_request_body("gpt-4o-mini", 0.7, &[Message::user("oi")], true);
        assert_eq!(body["stream"], true);
    }

    #[test]
    fn parses_completion_response() {
        let json: serde_json::Value = serde_json::from_str(
            r#"{
                "choices": [{"message": {"role": "assistant", "content": "tudo bem"}}],
                "usage": {"prompt_tokens": 3, "completion_tokens": 2}
            }"#,
        )
        .unwrap();
        let response = parse_response(json).unwrap();
        assert_eq!(response.content, "tudo bem");
        assert_eq!(response.usage.total_tokens(), 5);
    }

    #[test]
    fn missing_content_is_parse_error() {
        let json: serde_json::Value = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let err = parse_response(json).unwrap_err();
        assert!(matches!(err, AiError::ParseError(_)));
    }

    #[test]
    fn role_wire_names() {
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Assistant.as_str(), "assistant");
        assert_eq!(Role::System.as_str(), "system");
    }
}
