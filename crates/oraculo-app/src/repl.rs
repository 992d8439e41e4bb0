//! Interactive conversation loop.
//!
//! One render cycle per line of input: reconcile the configuration,
//! then either run a slash command or send the turn through the
//! pipeline, streaming the answer to stdout as it arrives.

use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader};

use oraculo_ai::Provider;
use oraculo_ingest::DocumentSource;

use crate::context::{Reconciliation, SessionContext};

const PROMPT: &str = "> ";

pub async fn run(mut ctx: SessionContext, app_title: &str) -> std::io::Result<()> {
    println!("🤖 Bem vindo ao {app_title}");
    println!("Digite sua dúvida, ou /ajuda para ver os comandos.\n");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        reconcile_and_report(&mut ctx).await;

        print!("{PROMPT}");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // EOF
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('/') {
            if !handle_command(&mut ctx, command) {
                break;
            }
            continue;
        }

        send_turn(&mut ctx, line).await;
    }

    println!("Até logo!");
    Ok(())
}

async fn reconcile_and_report(ctx: &mut SessionContext) {
    match ctx.reconcile().await {
        Reconciliation::Unchanged => {}
        Reconciliation::Rebuilt => {
            tracing::info!(provider = %ctx.provider, model = %ctx.model, "pipeline rebuilt");
        }
        Reconciliation::Failed(e) => {
            eprintln!("⚠️  {e}");
        }
    }
}

async fn send_turn(ctx: &mut SessionContext, input: &str) {
    let result = ctx
        .send(
            input,
            Box::new(|chunk| {
                print!("{chunk}");
                let _ = std::io::stdout().flush();
            }),
        )
        .await;

    match result {
        Ok(_) => println!("\n"),
        Err(e) => eprintln!("⚠️  {e}"),
    }
}

/// Handle a slash command. Returns false when the loop should exit.
fn handle_command(ctx: &mut SessionContext, command: &str) -> bool {
    let mut parts = command.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or("");
    let arg = parts.next().map(str::trim).unwrap_or("");

    match name {
        "sair" | "quit" => return false,
        "limpar" | "clear" => {
            ctx.clear_history();
            println!("Conversa limpa.");
        }
        "provedor" | "provider" => match arg.parse::<Provider>() {
            Ok(provider) => {
                ctx.set_provider(provider);
                println!("Provedor: {} (modelo {})", ctx.provider, ctx.model);
            }
            Err(e) => eprintln!("⚠️  {e}"),
        },
        "modelo" | "model" => {
            if arg.is_empty() {
                println!("Modelos de {}:", ctx.provider);
                for model in ctx.provider.models() {
                    println!("  {model}");
                }
            } else {
                if !ctx.provider.offers_model(arg) {
                    eprintln!("⚠️  modelo fora do catálogo de {}", ctx.provider);
                }
                ctx.set_model(arg);
            }
        }
        "tipo" | "type" => match arg.parse::<oraculo_ingest::FileType>() {
            Ok(file_type) => {
                ctx.set_file_type(file_type);
                println!("Tipo de arquivo: {file_type}");
            }
            Err(e) => eprintln!("⚠️  {e}"),
        },
        "fonte" | "source" => set_source(ctx, arg),
        "chave" | "key" => {
            ctx.set_api_key_override(arg);
            println!("Chave de API registrada para {}.", ctx.provider);
        }
        "uso" | "usage" => {
            let tracker = ctx.session().tracker();
            println!(
                "{} chamadas, {} tokens no total",
                tracker.call_count(),
                tracker.total_tokens()
            );
        }
        "ajuda" | "help" => print_help(),
        other => eprintln!("⚠️  comando desconhecido: /{other} (veja /ajuda)"),
    }
    true
}

fn set_source(ctx: &mut SessionContext, arg: &str) {
    if arg.is_empty() {
        ctx.set_source(None);
        println!("Fonte removida.");
        return;
    }

    if ctx.file_type.is_url_based() {
        ctx.set_source(Some(DocumentSource::Url(arg.to_string())));
        println!("Fonte: {arg}");
        return;
    }

    // Upload types take a local file path.
    match std::fs::read(arg) {
        Ok(bytes) => {
            let filename = std::path::Path::new(arg)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| arg.to_string());
            println!("Fonte: {filename} ({} bytes)", bytes.len());
            ctx.set_source(Some(DocumentSource::Upload { filename, bytes }));
        }
        Err(e) => eprintln!("⚠️  não foi possível ler {arg}: {e}"),
    }
}

fn print_help() {
    println!(
        "Comandos:\n\
         \x20 /provedor <OpenAI|Groq>   troca o provedor\n\
         \x20 /modelo [nome]            troca o modelo (sem argumento: lista)\n\
         \x20 /tipo <Site|Youtube|CSV|PDF|TXT>\n\
         \x20 /fonte <url ou caminho>   define o documento (vazio: remove)\n\
         \x20 /chave <api-key>          define a chave do provedor atual\n\
         \x20 /limpar                   limpa a conversa\n\
         \x20 /uso                      mostra o uso de tokens\n\
         \x20 /sair                     encerra"
    );
}
