//! Environment-driven settings with defaults.

use oraculo_ai::Provider;
use oraculo_common::ConfigError;
use oraculo_ingest::FileType;

/// Startup defaults and API keys for one UI session.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Title shown in the greeting (`APP_TITLE`).
    pub app_title: String,
    /// Provider selected at startup (`DEFAULT_PROVIDER`).
    pub provider: Provider,
    /// Startup model per provider (`DEFAULT_MODEL_OPENAI` / `DEFAULT_MODEL_GROQ`).
    pub model_openai: String,
    pub model_groq: String,
    /// File type selected at startup (`DEFAULT_FILE_TYPE`).
    pub file_type: FileType,
    /// Startup source: a URL, or a local path for upload types (`DEFAULT_SOURCE`).
    pub source: String,
    openai_api_key: Option<String>,
    groq_api_key: Option<String>,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup (testable without
    /// mutating the process environment).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let provider = match lookup("DEFAULT_PROVIDER") {
            Some(raw) => raw.parse::<Provider>()?,
            None => Provider::OpenAi,
        };
        let file_type = match lookup("DEFAULT_FILE_TYPE") {
            Some(raw) => raw.parse::<FileType>()?,
            None => FileType::Site,
        };

        let settings = Self {
            app_title: lookup("APP_TITLE").unwrap_or_else(|| "Oráculo".to_string()),
            provider,
            model_openai: lookup("DEFAULT_MODEL_OPENAI")
                .unwrap_or_else(|| Provider::OpenAi.default_model().to_string()),
            model_groq: lookup("DEFAULT_MODEL_GROQ")
                .unwrap_or_else(|| Provider::Groq.default_model().to_string()),
            file_type,
            source: lookup("DEFAULT_SOURCE").unwrap_or_default(),
            openai_api_key: lookup(Provider::OpenAi.env_key()).filter(|k| !k.trim().is_empty()),
            groq_api_key: lookup(Provider::Groq.env_key()).filter(|k| !k.trim().is_empty()),
        };

        settings.warn_on_unknown_models();
        Ok(settings)
    }

    fn warn_on_unknown_models(&self) {
        for (provider, model) in [
            (Provider::OpenAi, &self.model_openai),
            (Provider::Groq, &self.model_groq),
        ] {
            if !provider.offers_model(model) {
                tracing::warn!(%provider, %model, "default model not in provider catalog");
            }
        }
    }

    /// The startup model for a provider.
    pub fn default_model(&self, provider: Provider) -> &str {
        match provider {
            Provider::OpenAi => &self.model_openai,
            Provider::Groq => &self.model_groq,
        }
    }

    /// Resolve the API key for a provider. A non-blank explicit
    /// override (e.g. typed into the sidebar) wins over the environment.
    pub fn api_key(&self, provider: Provider, override_value: Option<&str>) -> Option<String> {
        if let Some(value) = override_value {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        match provider {
            Provider::OpenAi => self.openai_api_key.clone(),
            Provider::Groq => self.groq_api_key.clone(),
        }
    }
}
