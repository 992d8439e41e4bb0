use clap::Parser;

/// Oráculo — converse com documentos usando OpenAI ou Groq.
#[derive(Parser, Debug)]
#[command(name = "oraculo", version, about)]
pub struct Args {
    /// Provider override (OpenAI, Groq).
    #[arg(short = 'p', long)]
    pub provider: Option<String>,

    /// Model override.
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// File type override (Site, Youtube, CSV, PDF, TXT).
    #[arg(short = 't', long)]
    pub file_type: Option<String>,

    /// Initial source: a URL, or a local file path for upload types.
    #[arg(short = 's', long)]
    pub source: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
