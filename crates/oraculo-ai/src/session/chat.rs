//! Async chat methods for Session (send_message + streaming).

use crate::{AiError, ChatClient, Message, Role};

use super::manager::Session;
use super::types::BusyGuard;

impl Session {
    /// Add a user message and get the assistant's response in one shot.
    pub async fn chat(
        &mut self,
        client: &dyn ChatClient,
        user_message: impl Into<String>,
    ) -> Result<String, AiError> {
        let _guard = BusyGuard::acquire(&self.busy)?;

        self.messages.push(Message {
            role: Role::User,
            content: user_message.into(),
        });

        let messages = self.build_messages();
        let response = client.send_message(&messages).await?;

        self.tracker.record(&self.provider, &response.usage);
        self.messages.push(Message {
            role: Role::Assistant,
            content: response.content.clone(),
        });

        Ok(response.content)
    }

    /// Send a message with streaming, returning the reassembled response.
    ///
    /// The streamed chunks are delivered through `on_chunk` as they
    /// arrive; the full text is appended to history as a single
    /// assistant turn once the stream ends.
    pub async fn chat_streaming(
        &mut self,
        client: &dyn ChatClient,
        user_message: impl Into<String>,
        on_chunk: Box<dyn Fn(String) + Send + Sync>,
    ) -> Result<String, AiError> {
        let _guard = BusyGuard::acquire(&self.busy)?;

        self.messages.push(Message {
            role: Role::User,
            content: user_message.into(),
        });

        let messages = self.build_messages();
        let response = client.send_message_streaming(&messages, on_chunk).await?;

        self.tracker.record(&self.provider, &response.usage);
        self.messages.push(Message {
            role: Role::Assistant,
            content: response.content.clone(),
        });

        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChatResponse, TokenUsage};
    use async_trait::async_trait;

    /// Echoes the last user message back, prefixed.
    struct EchoClient;

    #[async_trait]
    impl ChatClient for EchoClient {
        async fn send_message(&self, messages: &[Message]) -> Result<ChatResponse, AiError> {
            let last = messages.last().map(|m| m.content.as_str()).unwrap_or("");
            Ok(ChatResponse {
                content: format!("eco: {last}"),
                usage: TokenUsage {
                    prompt_tokens: 2,
                    completion_tokens: 3,
                },
            })
        }

        async fn send_message_streaming(
            &self,
            messages: &[Message],
            on_chunk: Box<dyn Fn(String) + Send + Sync>,
        ) -> Result<ChatResponse, AiError> {
            let response = self.send_message(messages).await?;
            // Deliver in two chunks to exercise reassembly on the caller side.
            let mid = response.content.len() / 2;
            on_chunk(response.content[..mid].to_string());
            on_chunk(response.content[mid..].to_string());
            Ok(response)
        }
    }

    #[tokio::test]
    async fn chat_appends_both_turns() {
        let mut session = Session::new("OpenAI");
        let reply = session.chat(&EchoClient, "olá").await.unwrap();

        assert_eq!(reply, "eco: olá");
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.messages()[0].role, Role::User);
        assert_eq!(session.messages()[1].role, Role::Assistant);
        assert_eq!(session.messages()[1].content, "eco: olá");
    }

    #[tokio::test]
    async fn streaming_appends_single_assistant_turn() {
        let mut session = Session::new("Groq");
        let reply = session
            .chat_streaming(&EchoClient, "bom dia", Box::new(|_| {}))
            .await
            .unwrap();

        assert_eq!(reply, "eco: bom dia");
        // Two chunks arrived but history records one assistant message.
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.messages()[1].content, "eco: bom dia");
    }

    #[tokio::test]
    async fn usage_is_tracked_per_provider() {
        let mut session = Session::new("OpenAI");
        session.chat(&EchoClient, "um").await.unwrap();
        session.chat(&EchoClient, "dois").await.unwrap();

        assert_eq!(session.tracker().call_count(), 2);
        assert_eq!(session.tracker().total_tokens(), 10);
        assert!(session.tracker().for_provider("OpenAI").is_some());
        assert!(session.tracker().for_provider("Groq").is_none());
    }
}
