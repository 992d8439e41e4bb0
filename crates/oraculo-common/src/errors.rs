#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("API key not found for provider {provider}: set {env_key} in .env or pass it explicitly")]
    MissingApiKey { provider: String, env_key: String },

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("unknown file type: {0}")]
    UnknownFileType(String),

    #[error("config parse error: {0}")]
    ParseError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum OraculoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("ai error: {0}")]
    Ai(String),

    #[error("document load error: {0}")]
    Ingest(String),

    #[error("{0}")]
    Other(String),
}
