//! Chat pipeline construction.
//!
//! A pipeline is the composed unit invoked per user turn: the system
//! prompt (with the loaded document baked in at construction time)
//! plus a provider client bound to a model and API key. Pipelines are
//! immutable; configuration changes rebuild them from scratch.

use tracing::warn;

use oraculo_ai::{ChatClient, GroqClient, GroqConfig, OpenAiClient, OpenAiConfig, Provider};
use oraculo_common::{ConfigError, OraculoError};
use oraculo_ingest::{DocumentLoader, DocumentSource, FileType, LoadOutcome};

/// System prompt + bound provider client.
pub struct ChatPipeline {
    pub system_prompt: String,
    pub client: Box<dyn ChatClient>,
    pub provider: Provider,
    pub model: String,
}

impl std::fmt::Debug for ChatPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatPipeline")
            .field("system_prompt", &self.system_prompt)
            .field("provider", &self.provider)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Render the assistant's system prompt, embedding the document text
/// verbatim between the `####` fences.
pub fn render_system_prompt(file_type: Option<FileType>, document: &str) -> String {
    let label = file_type.map(|t| t.label()).unwrap_or("Nenhum");
    format!(
        "Você é um assistente amigável chamado Oráculo.\n\
         \n\
         Você possui acesso às seguintes informações vindas de um documento (se fornecido) {label}:\n\
         \n\
         ####\n\
         {document}\n\
         ####\n\
         \n\
         Utilize as informações fornecidas para basear as suas respostas.\n\
         \n\
         Sempre que houver $ na sua saída, substitua por S.\n\
         \n\
         Se a informação do documento for algo como Just a moment...Enable Javascript and cookies to continue\n\
         sugira ao usuário carregar novamente o Oráculo!\n"
    )
}

/// Build a pipeline for the current configuration.
///
/// A missing API key is a configuration error: the pipeline stays
/// unset and chat is disabled until a key is supplied. Document load
/// failures degrade to an empty document, except for exhausted site
/// retries, which surface so the UI can report them fatally.
pub async fn build_pipeline(
    loader: &DocumentLoader,
    provider: Provider,
    model: &str,
    api_key: Option<&str>,
    file_type: FileType,
    source: Option<&DocumentSource>,
) -> Result<ChatPipeline, OraculoError> {
    let api_key = api_key.ok_or_else(|| ConfigError::MissingApiKey {
        provider: provider.label().to_string(),
        env_key: provider.env_key().to_string(),
    })?;

    let document = match source {
        Some(source) => match loader.load(file_type, source).await {
            LoadOutcome::Loaded(text) => text,
            LoadOutcome::Empty => String::new(),
            LoadOutcome::Failed(reason) if file_type == FileType::Site => {
                return Err(OraculoError::Ingest(reason));
            }
            LoadOutcome::Failed(reason) => {
                warn!(%file_type, %reason, "document load failed, chatting without it");
                String::new()
            }
        },
        None => String::new(),
    };

    let system_prompt = render_system_prompt(Some(file_type), &document);

    let client: Box<dyn ChatClient> = match provider {
        Provider::OpenAi => Box::new(OpenAiClient::new(
            OpenAiConfig::new(api_key).with_model(model),
        )),
        Provider::Groq => Box::new(GroqClient::new(GroqConfig::new(api_key).with_model(model))),
    };

    Ok(ChatPipeline {
        system_prompt,
        client,
        provider,
        model: model.to_string(),
    })
}
