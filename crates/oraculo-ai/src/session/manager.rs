//! Session struct and conversation history management.

use std::sync::atomic::AtomicBool;

use crate::token_tracker::TokenTracker;
use crate::{Message, Role};

/// A conversation session with in-memory message history.
///
/// History is append-only during a session; `clear` resets it. The
/// system prompt is prepended to every API call but never stored in
/// the visible history.
pub struct Session {
    /// Conversation message history (user and assistant turns).
    pub(super) messages: Vec<Message>,
    /// System prompt (prepended to every API call).
    pub(super) system_prompt: Option<String>,
    /// Token usage tracker.
    pub(super) tracker: TokenTracker,
    /// Provider label for token tracking.
    pub(super) provider: String,
    /// Whether the session is currently processing a request.
    pub(super) busy: AtomicBool,
}

impl Session {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            system_prompt: None,
            tracker: TokenTracker::new(),
            provider: provider.into(),
            busy: AtomicBool::new(false),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Replace the system prompt in place (used after a pipeline rebuild).
    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) {
        self.system_prompt = Some(prompt.into());
    }

    pub(crate) fn build_messages(&self) -> Vec<Message> {
        let mut msgs = Vec::new();
        if let Some(ref system) = self.system_prompt {
            msgs.push(Message {
                role: Role::System,
                content: system.clone(),
            });
        }
        msgs.extend(self.messages.clone());
        msgs
    }

    /// Get the full conversation history.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Get the token tracker.
    pub fn tracker(&self) -> &TokenTracker {
        &self.tracker
    }

    /// Clear conversation history. The system prompt is untouched.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Number of messages in history.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new("default")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_messages_prepends_system_prompt() {
        let mut session = Session::new("OpenAI").with_system_prompt("seja breve");
        session.messages.push(Message::user("oi"));

        let msgs = session.build_messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, Role::System);
        assert_eq!(msgs[0].content, "seja breve");
        assert_eq!(msgs[1].role, Role::User);
    }

    #[test]
    fn clear_resets_history_but_not_system_prompt() {
        let mut session = Session::new("OpenAI").with_system_prompt("seja breve");
        session.messages.push(Message::user("um"));
        session.messages.push(Message::assistant("dois"));
        session.messages.push(Message::user("três"));

        session.clear();
        assert_eq!(session.message_count(), 0);
        assert_eq!(session.build_messages().len(), 1); // system prompt survives
    }

    #[test]
    fn clear_on_empty_history_is_noop() {
        let mut session = Session::default();
        session.clear();
        assert_eq!(session.message_count(), 0);
    }
}
