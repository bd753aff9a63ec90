//! OSS Translator - LLM-backed translation library
//!
//! This library translates text through an OpenAI compatible chat-completion
//! provider and exposes it as an HTTP API, an interactive CLI and a batch helper.
//! Token usage of every call is appended to a local JSON log.

#![forbid(unsafe_code)]

pub mod cli;
pub mod core;
pub mod server;

// Re-export key types for convenience
pub use crate::core::{
    client::{ChatProvider, OpenAiProvider, Translator},
    config::TranslatorConfig,
    errors::TranslationError,
    models::{TokenUsage, TranslationRequest, TranslationResult, UsageRecord, AUTO_SOURCE},
    usage_log::UsageLog,
};

pub use crate::cli::interactive::{InteractiveSession, SessionState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
