//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::PathBuf;
use tracing::info;

use crate::cli::interactive::InteractiveSession;
use crate::core::client::Translator;
use crate::core::config::TranslatorConfig;
use crate::core::models::AUTO_SOURCE;
use crate::core::usage_log::UsageLog;
use crate::server::api::{run_server, AppState};

/// Commands for the translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate interactively from standard input (default)
    Interactive,

    /// Start HTTP API server
    Server {
        /// Bind address (default: 0.0.0.0)
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Listen port (default: $PORT or 3000)
        #[arg(short, long, env = "PORT", default_value_t = 3000)]
        port: u16,
    },

    /// Translate several texts one after another
    Batch {
        /// Texts to translate
        texts: Vec<String>,

        /// File with one text per line
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Source language (default: auto-detect)
        #[arg(long, default_value = AUTO_SOURCE)]
        source_lang: String,

        /// Target language (default: English)
        #[arg(short, long, default_value = "English")]
        target_lang: String,
    },

    /// Show recorded token usage
    Usage,
}

fn build_translator(config: &TranslatorConfig) -> anyhow::Result<Translator> {
    Ok(Translator::new(config)?)
}

/// Handle interactive command
pub async fn handle_interactive(config: TranslatorConfig) -> anyhow::Result<()> {
    let translator = build_translator(&config)?;
    let session = InteractiveSession::new(translator, UsageLog::new(&config.tokens_file));

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    session.run(stdin, &mut stdout).await?;

    Ok(())
}

/// Handle server command
pub async fn handle_server(config: TranslatorConfig, host: String, port: u16) -> anyhow::Result<()> {
    let translator = build_translator(&config)?;
    let state = AppState::new(translator, UsageLog::new(&config.tokens_file));

    info!("Usage log: {}", config.tokens_file.display());
    println!("🌐 Translator API running at http://{}:{}", host, port);
    println!("Press Ctrl+C to stop");

    run_server(state, host, port).await
}

/// Collect batch inputs from arguments and an optional file
async fn collect_texts(texts: Vec<String>, file: Option<PathBuf>) -> anyhow::Result<Vec<String>> {
    let mut all = texts;

    if let Some(path) = file {
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        all.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    Ok(all)
}

/// Handle batch command
pub async fn handle_batch(
    config: TranslatorConfig,
    texts: Vec<String>,
    file: Option<PathBuf>,
    source_lang: String,
    target_lang: String,
) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::{Duration, Instant};

    let texts = collect_texts(texts, file).await?;
    if texts.is_empty() {
        anyhow::bail!("No texts to translate");
    }

    let translator = build_translator(&config)?;
    let start_time = Instant::now();

    info!("Starting batch translation");
    info!("Texts: {}", texts.len());
    info!("Languages: {} -> {}", source_lang, target_lang);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Translating {} texts", texts.len()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = translator
        .translate_batch(&texts, &source_lang, &target_lang)
        .await;
    pb.finish_and_clear();
    let translations = result?;

    for (text, translated) in texts.iter().zip(&translations) {
        println!("{} → {}", text, translated);
    }

    println!("\n✅ Batch translation completed!");
    println!("   Translated: {}", translations.len());
    println!("   Time: {:?}", start_time.elapsed());

    Ok(())
}

/// Handle usage command
pub async fn handle_usage(tokens_file: PathBuf) -> anyhow::Result<()> {
    let log = UsageLog::new(tokens_file);
    let records = log.try_read_all().await?;

    if records.is_empty() {
        println!("No token usage recorded in {}", log.path().display());
        return Ok(());
    }

    for (i, record) in records.iter().enumerate() {
        println!("{}. Input={}, Output={}", i + 1, record.input, record.output);
    }

    let input: u64 = records.iter().map(|r| r.input).sum();
    let output: u64 = records.iter().map(|r| r.output).sum();
    println!("\n📊 {} calls", records.len());
    println!("   Input tokens: {}", input);
    println!("   Output tokens: {}", output);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_texts_from_args_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("texts.txt");
        std::fs::write(&path, "Good morning\n\n  Thank you  \n").unwrap();

        let texts = collect_texts(vec!["Please".to_string()], Some(path))
            .await
            .unwrap();

        assert_eq!(texts, vec!["Please", "Good morning", "Thank you"]);
    }

    #[tokio::test]
    async fn test_collect_texts_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = collect_texts(vec![], Some(dir.path().join("nope.txt"))).await;
        assert!(result.is_err());
    }
}
