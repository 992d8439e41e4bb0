mod cli;
mod context;
mod pipeline;
mod repl;

use tracing_subscriber::EnvFilter;

use oraculo_ingest::DocumentSource;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Parse CLI arguments
    let args = cli::parse();

    // Initialize logging
    let log_directive = args.log_level.as_deref().unwrap_or("oraculo=info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "oraculo=info".parse().expect("static directive")),
            ),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Oráculo v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load settings (.env + environment, with defaults)
    let settings = match oraculo_config::load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("⚠️  configuração inválida: {e}");
            std::process::exit(1);
        }
    };
    let app_title = settings.app_title.clone();

    let mut ctx = context::SessionContext::new(settings);
    if let Err(e) = apply_overrides(&mut ctx, &args) {
        eprintln!("⚠️  {e}");
        std::process::exit(1);
    }

    repl::run(ctx, &app_title).await
}

/// Apply CLI overrides on top of the environment defaults.
fn apply_overrides(
    ctx: &mut context::SessionContext,
    args: &cli::Args,
) -> Result<(), oraculo_common::OraculoError> {
    if let Some(ref provider) = args.provider {
        ctx.set_provider(provider.parse()?);
    }
    if let Some(ref file_type) = args.file_type {
        ctx.set_file_type(file_type.parse()?);
    }
    if let Some(ref model) = args.model {
        ctx.set_model(model.clone());
    }
    if let Some(ref source) = args.source {
        if ctx.file_type.is_url_based() {
            ctx.set_source(Some(DocumentSource::Url(source.clone())));
        } else {
            let bytes = std::fs::read(source)?;
            let filename = std::path::Path::new(source)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| source.clone());
            ctx.set_source(Some(DocumentSource::Upload { filename, bytes }));
        }
    }
    Ok(())
}
