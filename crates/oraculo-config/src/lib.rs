//! Oráculo configuration system.
//!
//! Settings come from environment variables (optionally via a `.env`
//! file), all with sensible defaults so an empty environment works out
//! of the box. API keys are resolved per provider, with an explicit
//! override taking precedence over the environment.

pub mod settings;

pub use settings::Settings;

use oraculo_common::ConfigError;

/// Convenience function: load `.env` if present, then read settings
/// from the environment.
pub fn load_settings() -> Result<Settings, ConfigError> {
    // Missing .env is fine; only real env vars are required to exist.
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
    Settings::from_env()
}
