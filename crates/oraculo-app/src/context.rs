//! Session context and configuration reconciliation.
//!
//! The context is the single owner of everything a UI session mutates:
//! the effective configuration, the conversation history, and the
//! current pipeline. Once per cycle `reconcile` compares the effective
//! configuration against the last recorded key and rebuilds the
//! pipeline on any change. There is no partial invalidation: any
//! change reloads the document and rebinds the client.

use tracing::debug;

use oraculo_ai::{Provider, Session};
use oraculo_common::OraculoError;
use oraculo_config::Settings;
use oraculo_ingest::{normalize_url, DocumentLoader, DocumentSource, FileType, RetryPolicy};

use crate::pipeline::{build_pipeline, ChatPipeline};

/// Comparison key for change detection. Uploaded bytes are not hashed;
/// like the UI they are tracked only by shape and filename.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ConfigKey {
    provider: Provider,
    model: String,
    file_type: FileType,
    source_kind: Option<String>,
    source_url: Option<String>,
    api_key: Option<String>,
}

/// What a reconciliation pass did.
#[derive(Debug)]
pub enum Reconciliation {
    /// Configuration key unchanged; pipeline untouched.
    Unchanged,
    /// Configuration changed and the pipeline was rebuilt.
    Rebuilt,
    /// Configuration changed but the pipeline could not be built;
    /// chat stays disabled until the configuration is corrected.
    Failed(OraculoError),
}

/// Single-owner session state: configuration, history, pipeline.
pub struct SessionContext {
    pub provider: Provider,
    pub model: String,
    pub file_type: FileType,
    pub source: Option<DocumentSource>,
    api_key_override: Option<String>,
    settings: Settings,
    loader: DocumentLoader,
    session: Session,
    pipeline: Option<ChatPipeline>,
    last_key: Option<ConfigKey>,
}

impl SessionContext {
    pub fn new(settings: Settings) -> Self {
        Self::with_loader(settings, DocumentLoader::new(RetryPolicy::default()))
    }

    pub fn with_loader(settings: Settings, loader: DocumentLoader) -> Self {
        let provider = settings.provider;
        let model = settings.default_model(provider).to_string();
        let file_type = settings.file_type;
        let source = if settings.source.trim().is_empty() {
            None
        } else {
            Some(DocumentSource::Url(settings.source.clone()))
        };

        Self {
            provider,
            model,
            file_type,
            source,
            api_key_override: None,
            session: Session::new(provider.label()),
            settings,
            loader,
            pipeline: None,
            last_key: None,
        }
    }

    fn current_key(&self) -> ConfigKey {
        ConfigKey {
            provider: self.provider,
            model: self.model.clone(),
            file_type: self.file_type,
            source_kind: self.source.as_ref().map(|s| {
                match s {
                    DocumentSource::Url(_) => "url".to_string(),
                    DocumentSource::Upload { filename, .. } => format!("upload:{filename}"),
                }
            }),
            source_url: self
                .source
                .as_ref()
                .and_then(|s| s.url_str())
                .map(str::to_string),
            api_key: self.api_key(),
        }
    }

    fn api_key(&self) -> Option<String> {
        self.settings
            .api_key(self.provider, self.api_key_override.as_deref())
    }

    /// Detect configuration changes and rebuild the pipeline if needed.
    /// Calling again with an unchanged configuration is a no-op.
    pub async fn reconcile(&mut self) -> Reconciliation {
        let key = self.current_key();
        if self.last_key.as_ref() == Some(&key) {
            return Reconciliation::Unchanged;
        }

        debug!(provider = %self.provider, model = %self.model, file_type = %self.file_type,
               "configuration changed, rebuilding pipeline");

        self.last_key = Some(key);
        self.pipeline = None;

        // URL-typed sources are re-normalized before the reload.
        if self.file_type.is_url_based() {
            if let Some(DocumentSource::Url(raw)) = &self.source {
                let normalized = normalize_url(raw);
                self.source = if normalized.is_empty() {
                    None
                } else {
                    Some(DocumentSource::Url(normalized))
                };
            }
        }

        let built = build_pipeline(
            &self.loader,
            self.provider,
            &self.model,
            self.api_key().as_deref(),
            self.file_type,
            self.source.as_ref(),
        )
        .await;

        match built {
            Ok(pipeline) => {
                self.session.set_system_prompt(pipeline.system_prompt.clone());
                self.pipeline = Some(pipeline);
                Reconciliation::Rebuilt
            }
            Err(e) => Reconciliation::Failed(e),
        }
    }

    pub fn pipeline(&self) -> Option<&ChatPipeline> {
        self.pipeline.as_ref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Send a user turn through the pipeline, streaming chunks to
    /// `on_chunk`. With no pipeline bound, input is rejected and
    /// history is left untouched.
    pub async fn send(
        &mut self,
        input: &str,
        on_chunk: Box<dyn Fn(String) + Send + Sync>,
    ) -> Result<String, OraculoError> {
        let Some(pipeline) = self.pipeline.as_ref() else {
            return Err(OraculoError::Other(
                "Não foi possível iniciar o Oráculo (verifique a API key).".into(),
            ));
        };

        self.session
            .chat_streaming(pipeline.client.as_ref(), input, on_chunk)
            .await
            .map_err(|e| OraculoError::Ai(e.to_string()))
    }

    /// Reset conversation history, independent of pipeline state.
    pub fn clear_history(&mut self) {
        self.session.clear();
    }

    pub fn set_provider(&mut self, provider: Provider) {
        if self.provider != provider {
            self.provider = provider;
            self.model = self.settings.default_model(provider).to_string();
        }
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    pub fn set_file_type(&mut self, file_type: FileType) {
        if self.file_type != file_type {
            self.file_type = file_type;
            // A source only makes sense for the type it was entered for.
            self.source = None;
        }
    }

    pub fn set_source(&mut self, source: Option<DocumentSource>) {
        self.source = source;
    }

    pub fn set_api_key_override(&mut self, key: impl Into<String>) {
        self.api_key_override = Some(key.into());
    }
}
