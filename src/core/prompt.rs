//! Prompt construction

use crate::core::models::{ChatMessage, TranslationRequest};

/// Persona given to the model for every call
pub const SYSTEM_PROMPT: &str = "You are a professional translator. Translate accurately and preserve the meaning, tone, and style of the original text.";

const ONLY_TRANSLATION: &str =
    "Only provide the translation, no explanations or additional text:";

/// Build the user instruction for a request
pub fn build_prompt(request: &TranslationRequest) -> String {
    if request.is_auto_source() {
        format!(
            "Translate the following text to {}. {}\n\n{}",
            request.target_lang, ONLY_TRANSLATION, request.text
        )
    } else {
        format!(
            "Translate the following text from {} to {}. {}\n\n{}",
            request.source_lang, request.target_lang, ONLY_TRANSLATION, request.text
        )
    }
}

/// System + user messages for a request
pub fn build_messages(request: &TranslationRequest) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_prompt(request)),
    ]
}
