//! Token usage tracking across sessions and providers.

use std::collections::HashMap;

use crate::TokenUsage;

/// Tracks cumulative token usage per provider.
pub struct TokenTracker {
    /// Total usage across all providers.
    total: TokenUsage,
    /// Usage broken down by provider name.
    by_provider: HashMap<String, TokenUsage>,
    /// Number of API calls made.
    call_count: u64,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self {
            total: TokenUsage::default(),
            by_provider: HashMap::new(),
            call_count: 0,
        }
    }

    /// Record token usage from an API call.
    pub fn record(&mut self, provider: &str, usage: &TokenUsage) {
        self.total.prompt_tokens += usage.prompt_tokens;
        self.total.completion_tokens += usage.completion_tokens;
        self.call_count += 1;

        let entry = self.by_provider.entry(provider.to_string()).or_default();
        entry.prompt_tokens += usage.prompt_tokens;
        entry.completion_tokens += usage.completion_tokens;
    }

    /// Get total token usage.
    pub fn total(&self) -> &TokenUsage {
        &self.total
    }

    /// Get usage for a specific provider.
    pub fn for_provider(&self, provider: &str) -> Option<&TokenUsage> {
        self.by_provider.get(provider)
    }

    /// Get total tokens (prompt + completion).
    pub fn total_tokens(&self) -> u64 {
        self.total
            .prompt_tokens
            .saturating_add(self.total.completion_tokens)
    }

    /// Get number of API calls.
    pub fn call_count(&self) -> u64 {
        self.call_count
    }

    /// Reset all counters.
    pub fn reset(&mut self) {
        self.total = TokenUsage::default();
        self.by_provider.clear();
        self.call_count = 0;
    }
}

impl Default for TokenTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accumulates_per_provider() {
        let mut tracker = TokenTracker::new();
        tracker.record(
            "OpenAI",
            &TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
            },
        );
        tracker.record(
            "Groq",
            &TokenUsage {
                prompt_tokens: 1,
                completion_tokens: 2,
            },
        );

        assert_eq!(tracker.call_count(), 2);
        assert_eq!(tracker.total_tokens(), 18);
        assert_eq!(tracker.for_provider("OpenAI").unwrap().total_tokens(), 15);
        assert_eq!(tracker.for_provider("Groq").unwrap().total_tokens(), 3);
    }

    #[test]
    fn reset_clears_everything() {
        let mut tracker = TokenTracker::new();
        tracker.record(
            "OpenAI",
            &TokenUsage {
                prompt_tokens: 1,
                completion_tokens: 1,
            },
        );
        tracker.reset();
        assert_eq!(tracker.call_count(), 0);
        assert_eq!(tracker.total_tokens(), 0);
        assert!(tracker.for_provider("OpenAI").is_none());
    }
}
