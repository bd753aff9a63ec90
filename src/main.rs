//! Main entry point for the OSS Translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oss_translator::cli::commands::{self, Commands};
use oss_translator::core::config::TranslatorConfig;

/// OSS Translator - translate text with a hosted LLM
#[derive(Parser, Debug)]
#[command(name = "oss-translator", version, about, long_about = None)]
struct Args {
    /// API key for the provider (optional, defaults to HF_TOKEN env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging. Logs go to stderr so the interactive prompt stays readable.
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("oss_translator={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Override config with CLI args if provided
    if let Some(api_key) = args.api_key {
        std::env::set_var("HF_TOKEN", api_key);
    }

    match args.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            commands::handle_interactive(TranslatorConfig::from_env()?).await?;
        }
        Commands::Server { host, port } => {
            commands::handle_server(TranslatorConfig::from_env()?, host, port).await?;
        }
        Commands::Batch {
            texts,
            file,
            source_lang,
            target_lang,
        } => {
            commands::handle_batch(
                TranslatorConfig::from_env()?,
                texts,
                file,
                source_lang,
                target_lang,
            )
            .await?;
        }
        Commands::Usage => {
            commands::handle_usage(TranslatorConfig::tokens_file_from_env()).await?;
        }
    }

    Ok(())
}
