//! Chat-completion client and translator

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{
    ChatCompletionRequest, ChatCompletionResponse, TranslationRequest, TranslationResult,
};
use crate::core::prompt::build_messages;

/// Anything able to answer a chat-completion request
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a single chat-completion request. Implementations must not retry.
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse>;
}

/// OpenAI compatible HTTP provider
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl OpenAiProvider {
    /// Create a provider from configuration
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10);

        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.completions_url(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status();

        if !status.is_success() {
            let status_code = status.as_u16();
            let error_text = response.text().await.unwrap_or_default();

            error!("Response status: {}", status_code);
            error!("Response data: {}", error_text);

            return Err(TranslationError::ApiError {
                status: status_code,
                message: error_text,
            });
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| TranslationError::InvalidResponseError {
                message: e.to_string(),
            })
    }
}

/// Translator built on top of a chat provider
#[derive(Clone)]
pub struct Translator {
    provider: Arc<dyn ChatProvider>,
    model: String,
    temperature: f32,
}

impl Translator {
    /// Create a translator talking to the configured HTTP endpoint
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        config.validate()?;
        let provider = OpenAiProvider::new(config)?;
        Ok(Self::with_provider(Arc::new(provider), config))
    }

    /// Create a translator with a custom provider
    pub fn with_provider(provider: Arc<dyn ChatProvider>, config: &TranslatorConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Translate a single request.
    ///
    /// Usage is only returned when `want_usage` is set and the provider reported it.
    pub async fn translate(
        &self,
        request: &TranslationRequest,
        want_usage: bool,
    ) -> Result<TranslationResult> {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: build_messages(request),
            temperature: self.temperature,
        };

        debug!(
            "Translating {} chars: {} -> {}",
            request.text.chars().count(),
            request.source_lang,
            request.target_lang
        );

        let response = self.provider.complete(&body).await.map_err(|e| {
            error!("Translation error: {}", e);
            e
        })?;

        let translated_text = response
            .first_content()
            .ok_or_else(|| TranslationError::InvalidResponseError {
                message: "No translation in response".to_string(),
            })?
            .trim()
            .to_string();

        let usage = if want_usage {
            response.usage.map(Into::into)
        } else {
            None
        };

        Ok(TranslationResult {
            translated_text,
            usage,
        })
    }

    /// Translate texts one after another, keeping input order.
    ///
    /// The first failure aborts the whole batch.
    pub async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>> {
        let mut results = Vec::with_capacity(texts.len());

        for text in texts {
            let request =
                TranslationRequest::new(text.as_str(), target_lang).with_source_lang(source_lang);
            let result = self.translate(&request, false).await?;
            results.push(result.translated_text);
        }

        Ok(results)
    }
}
