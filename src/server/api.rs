//! HTTP API server implementation

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use crate::core::client::Translator;
use crate::core::models::{TokenUsage, TranslationRequest, AUTO_SOURCE};
use crate::core::usage_log::UsageLog;

/// Application state
#[derive(Clone)]
pub struct AppState {
    translator: Translator,
    usage_log: UsageLog,
}

impl AppState {
    pub fn new(translator: Translator, usage_log: UsageLog) -> Self {
        Self {
            translator,
            usage_log,
        }
    }
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

/// Translation request body. Every field is optional so that missing fields
/// are reported by the handler itself.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub text: Option<String>,
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
}

/// Translation response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub success: bool,
    pub translated_text: String,
    pub source_lang: String,
    pub target_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Failures of the translate endpoint
#[derive(Debug)]
pub enum ApiError {
    MissingFields,
    InvalidBody(String),
    TranslationFailed(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MissingFields => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Missing required fields: text and targetLang are required"
                        .to_string(),
                    message: None,
                },
            ),
            ApiError::InvalidBody(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Invalid request body".to_string(),
                    message: Some(message),
                },
            ),
            ApiError::TranslationFailed(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "Translation failed".to_string(),
                    message: Some(message),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Health check handler
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Translation handler
async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;

    let (Some(text), Some(target_lang)) = (non_empty(payload.text), non_empty(payload.target_lang))
    else {
        return Err(ApiError::MissingFields);
    };
    let source_lang =
        non_empty(payload.source_lang).unwrap_or_else(|| AUTO_SOURCE.to_string());

    let request = TranslationRequest::new(text, target_lang).with_source_lang(source_lang);

    let result = state
        .translator
        .translate(&request, true)
        .await
        .map_err(|e| {
            match e.status() {
                Some(status) => error!("Translation API error (provider status {}): {}", status, e),
                None => error!("Translation API error: {}", e),
            }
            ApiError::TranslationFailed(e.to_string())
        })?;

    if let Some(usage) = result.usage {
        state.usage_log.append(usage.input, usage.output).await;
    }

    Ok(Json(TranslateResponse {
        success: true,
        translated_text: result.translated_text,
        source_lang: request.source_lang,
        target_lang: request.target_lang,
        usage: result.usage,
    }))
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/translate", post(translate))
        .with_state(Arc::new(state))
}

/// Run the HTTP server
pub async fn run_server(state: AppState, host: String, port: u16) -> anyhow::Result<()> {
    let app = router(state);

    // Bind address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Starting server on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
