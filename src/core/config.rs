//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::core::errors::{Result, TranslationError};

/// Hugging Face router, OpenAI compatible
pub const DEFAULT_API_BASE_URL: &str = "https://router.huggingface.co/v1";
/// Model used for every translation
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b:groq";
/// Low temperature keeps translations consistent between calls
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
/// Usage log location
pub const DEFAULT_TOKENS_FILE: &str = "tokens.json";

/// Configuration for translator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    pub api_key: String,
    pub api_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub tokens_file: PathBuf,
    /// No timeout when unset
    pub timeout_ms: Option<u64>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            tokens_file: PathBuf::from(DEFAULT_TOKENS_FILE),
            timeout_ms: None,
        }
    }
}

impl TranslatorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("HF_TOKEN").map_err(|_| TranslationError::ConfigError {
            message: "HF_TOKEN environment variable is required".to_string(),
        })?;

        let api_base_url =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let model = std::env::var("MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let temperature = match std::env::var("TEMPERATURE") {
            Ok(value) => value.parse::<f32>().map_err(|e| TranslationError::ConfigError {
                message: format!("invalid TEMPERATURE '{}': {}", value, e),
            })?,
            Err(_) => DEFAULT_TEMPERATURE,
        };

        let tokens_file = Self::tokens_file_from_env();

        let timeout_ms = match std::env::var("REQUEST_TIMEOUT_MS") {
            Ok(value) => Some(value.parse::<u64>().map_err(|e| {
                TranslationError::ConfigError {
                    message: format!("invalid REQUEST_TIMEOUT_MS '{}': {}", value, e),
                }
            })?),
            Err(_) => None,
        };

        let config = Self {
            api_key,
            api_base_url,
            model,
            temperature,
            tokens_file,
            timeout_ms,
        };
        debug!(
            "Loaded config: endpoint={}, model={}, temperature={}",
            config.api_base_url, config.model, config.temperature
        );

        Ok(config)
    }

    /// Usage log path from `TOKENS_FILE`, falling back to the default
    pub fn tokens_file_from_env() -> PathBuf {
        std::env::var("TOKENS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKENS_FILE))
    }

    /// Chat-completion endpoint derived from the base URL
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base_url.trim_end_matches('/'))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(config_error("API key is required"));
        }

        if self.api_base_url.is_empty() {
            return Err(config_error("API base URL is required"));
        }

        if self.model.is_empty() {
            return Err(config_error("model is required"));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(config_error("temperature must be between 0.0 and 2.0"));
        }

        Ok(())
    }
}

fn config_error(message: &str) -> TranslationError {
    TranslationError::ConfigError {
        message: message.to_string(),
    }
}
