//! Library usage: single, auto-detect, multi-target and batch translation
//!
//! Run with: cargo run --example translate_example (needs HF_TOKEN)

use oss_translator::{Translator, TranslatorConfig, TranslationRequest};

async fn run() -> anyhow::Result<()> {
    let translator = Translator::new(&TranslatorConfig::from_env()?)?;

    println!("Example 1: Simple Translation");
    println!("{}", "=".repeat(50));
    let text = "Hello, how are you?";
    let request = TranslationRequest::new(text, "Spanish").with_source_lang("English");
    let result = translator.translate(&request, false).await?;
    println!("Original: {}", text);
    println!("Translated: {}\n", result.translated_text);

    println!("Example 2: Auto-detect Source Language");
    println!("{}", "=".repeat(50));
    let text = "Bonjour, comment allez-vous?";
    let result = translator
        .translate(&TranslationRequest::new(text, "English"), true)
        .await?;
    println!("Original: {}", text);
    println!("Translated: {}", result.translated_text);
    if let Some(usage) = result.usage {
        println!("Tokens: Input={}, Output={}", usage.input, usage.output);
    }
    println!();

    println!("Example 3: Translate to Multiple Languages");
    println!("{}", "=".repeat(50));
    let text = "The weather is beautiful today.";
    for lang in ["Spanish", "French", "German", "Italian"] {
        let request = TranslationRequest::new(text, lang).with_source_lang("English");
        let result = translator.translate(&request, false).await?;
        println!("{}: {}", lang, result.translated_text);
    }
    println!();

    println!("Example 4: Batch Translation");
    println!("{}", "=".repeat(50));
    let texts: Vec<String> = ["Good morning", "Thank you", "Please", "Excuse me"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let translated = translator
        .translate_batch(&texts, "English", "Spanish")
        .await?;
    for (text, translation) in texts.iter().zip(&translated) {
        println!("{} → {}", text, translation);
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(e) = run().await {
        eprintln!("Error in examples: {}", e);
        std::process::exit(1);
    }
}
