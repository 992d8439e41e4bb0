//! Provider registry — model catalogs and API key resolution.
//!
//! Mirrors what the UI offers: a fixed set of hosted chat-completion
//! vendors, each with its model list and the env var holding its key.

use std::fmt;
use std::str::FromStr;

use oraculo_common::ConfigError;

/// Which hosted chat-completion vendor to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAi,
    Groq,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::OpenAi, Provider::Groq];

    /// Display name, as shown in selectors and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Groq => "Groq",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn env_key(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Groq => "GROQ_API_KEY",
        }
    }

    /// Models offered for this provider.
    pub fn models(&self) -> &'static [&'static str] {
        match self {
            Provider::OpenAi => &[
                "gpt-5",
                "gpt-5-mini",
                "gpt-5-nano",
                "gpt-4.1",
                "gpt-4.1-mini",
                "gpt-4o",
                "gpt-4o-mini",
                "o3",
                "o3-mini",
            ],
            Provider::Groq => &[
                "llama-3.1-70b-versatile",
                "llama-3.1-8b-instant",
                "mixtral-8x7b-32768",
                "gemma2-9b-it",
            ],
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Groq => "llama-3.1-8b-instant",
        }
    }

    /// Whether `model` appears in this provider's catalog.
    pub fn offers_model(&self, model: &str) -> bool {
        self.models().contains(&model)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "groq" => Ok(Provider::Groq),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!(" groq ".parse::<Provider>().unwrap(), Provider::Groq);
    }

    #[test]
    fn rejects_unknown_provider() {
        let err = "Mistral".parse::<Provider>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProvider(_)));
    }

    #[test]
    fn default_model_is_in_catalog() {
        for provider in Provider::ALL {
            assert!(provider.offers_model(provider.default_model()));
        }
    }

    #[test]
    fn env_keys_match_labels() {
        assert_eq!(Provider::OpenAi.env_key(), "OPENAI_API_KEY");
        assert_eq!(Provider::Groq.env_key(), "GROQ_API_KEY");
    }
}
