//! Language model capability.
//!
//! The rest of the crate only sees [`LanguageModel`]: an ordered list of
//! turns in, free text out. [`OpenAiCompatibleModel`] talks to a chat
//! completions endpoint; [`MockModel`] is a scripted stand-in.

use async_trait::async_trait;
use biograph_core::Turn;

pub mod mock;
pub mod openai_compat;

pub use mock::MockModel;
pub use openai_compat::OpenAiCompatibleModel;

/// Errors from a language model call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LlmError {
    #[error("{0} not configured")]
    MissingCredential(String),
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("unparseable response: {0}")]
    Parse(String),
}

/// Opaque `complete(messages) -> text` capability.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Whether the model can be called at all (e.g. its credential is set).
    ///
    /// Checked before any session state is touched.
    fn check_configured(&self) -> Result<(), LlmError> {
        Ok(())
    }

    /// Complete the conversation. `messages` are sent in the given order.
    async fn complete(&self, messages: &[Turn]) -> Result<String, LlmError>;
}
