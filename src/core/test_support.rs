//! Scripted provider shared by unit tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::core::client::ChatProvider;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{ChatCompletionRequest, ChatCompletionResponse, ProviderUsage};

pub(crate) enum Reply {
    Response(ChatCompletionResponse),
    Status(u16, String),
}

impl Reply {
    pub(crate) fn content(text: &str) -> Self {
        Reply::Response(ChatCompletionResponse::with_content(text, None))
    }

    pub(crate) fn content_with_usage(text: &str, usage: Option<ProviderUsage>) -> Self {
        Reply::Response(ChatCompletionResponse::with_content(text, usage))
    }

    pub(crate) fn status(status: u16, body: &str) -> Self {
        Reply::Status(status, body.to_string())
    }
}

/// Replays replies in order and records every request it receives
pub(crate) struct MockProvider {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<ChatCompletionRequest>>,
}

impl MockProvider {
    pub(crate) fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn calls(&self) -> Vec<ChatCompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        self.calls.lock().unwrap().push(request.clone());

        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Status(status, message)) => {
                Err(TranslationError::ApiError { status, message })
            }
            None => Err(TranslationError::InvalidResponseError {
                message: "no scripted reply left".to_string(),
            }),
        }
    }
}
