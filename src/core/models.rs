//! Core data models for translation

use serde::{Deserialize, Serialize};

/// Sentinel source language asking the model to detect the language itself
pub const AUTO_SOURCE: &str = "auto";

/// Translation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_lang: AUTO_SOURCE.to_string(),
            target_lang: target_lang.into(),
        }
    }

    /// Set the source language. Empty values fall back to auto-detection.
    pub fn with_source_lang(mut self, source_lang: impl Into<String>) -> Self {
        let source_lang = source_lang.into();
        self.source_lang = if source_lang.is_empty() {
            AUTO_SOURCE.to_string()
        } else {
            source_lang
        };
        self
    }

    /// Whether the source language should be inferred by the model
    pub fn is_auto_source(&self) -> bool {
        self.source_lang == AUTO_SOURCE
    }
}

/// Token counts of a single provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input: u64,
    pub output: u64,
}

/// One entry of the usage log
pub type UsageRecord = TokenUsage;

/// Translation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub translated_text: String,
    pub usage: Option<TokenUsage>,
}

/// Chat message sent to the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat-completion request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

/// Chat-completion response body. Only the fields we read are modelled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<ProviderUsage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Usage counters as reported by the provider
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ProviderUsage {
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    #[serde(default)]
    pub completion_tokens: Option<u64>,
}

impl From<ProviderUsage> for TokenUsage {
    fn from(usage: ProviderUsage) -> Self {
        Self {
            input: usage.prompt_tokens.unwrap_or(0),
            output: usage.completion_tokens.unwrap_or(0),
        }
    }
}

impl ChatCompletionResponse {
    /// Build a response with a single choice, mostly useful for stub providers
    pub fn with_content(content: impl Into<String>, usage: Option<ProviderUsage>) -> Self {
        Self {
            choices: vec![ChatChoice {
                message: Some(ChoiceMessage {
                    content: Some(content.into()),
                }),
            }],
            usage,
        }
    }

    /// Content of the first choice, if the provider sent one
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
    }
}
