use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use biograph_core::Turn;

use super::{LanguageModel, LlmError};

/// Scripted language model for tests and offline runs.
///
/// Replies are taken from a queue; once it is drained the default reply is
/// used. Every call's message list is recorded for inspection.
pub struct MockModel {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    default_reply: String,
    configured: bool,
    calls: Mutex<Vec<Vec<Turn>>>,
}

impl MockModel {
    /// A model that always answers `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            default_reply: reply.into(),
            configured: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A model whose credential is missing.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new("")
        }
    }

    /// Queue a one-off result ahead of the default reply.
    pub fn push(&self, result: Result<String, LlmError>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(result);
        }
    }

    /// Messages passed to each call so far, in call order.
    pub fn calls(&self) -> Vec<Vec<Turn>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    fn check_configured(&self) -> Result<(), LlmError> {
        if self.configured {
            Ok(())
        } else {
            Err(LlmError::MissingCredential("MOCK_API_KEY".to_string()))
        }
    }

    async fn complete(&self, messages: &[Turn]) -> Result<String, LlmError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }
        let queued = self.replies.lock().ok().and_then(|mut r| r.pop_front());
        match queued {
            Some(result) => result,
            None => Ok(self.default_reply.clone()),
        }
    }
}
