//! Grounded answer engine.
//!
//! Stateless: every call is a function of the corpus, the message, the
//! history the caller chose to pass, and the options. Truncating history is
//! the caller's job.

use std::sync::Arc;

use biograph_core::{BiographError, CorpusContext, Turn};

use crate::llm::{LanguageModel, LlmError};
use crate::prompt::{AnswerOptions, PromptBundle};

/// Errors from producing a grounded answer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Model(#[from] LlmError),
    #[error("model returned an empty reply")]
    EmptyReply,
}

impl From<EngineError> for BiographError {
    fn from(err: EngineError) -> Self {
        BiographError::Engine(err.to_string())
    }
}

/// Builds prompts and calls the language model.
#[derive(Clone)]
pub struct AnswerEngine {
    model: Arc<dyn LanguageModel>,
}

impl AnswerEngine {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Fails when the underlying model cannot be called at all.
    pub fn check_configured(&self) -> Result<(), LlmError> {
        self.model.check_configured()
    }

    /// Answer `message` from `context`, continuing `history`.
    pub async fn answer(
        &self,
        context: &CorpusContext,
        message: &str,
        history: &[Turn],
        options: &AnswerOptions,
    ) -> Result<String, EngineError> {
        let bundle = PromptBundle::new(context, message, history, options);
        self.complete(&bundle).await
    }

    /// Send a prepared bundle.
    pub async fn complete(&self, bundle: &PromptBundle) -> Result<String, EngineError> {
        let messages = bundle.messages();
        tracing::debug!(
            model = %self.model.name(),
            history = bundle.history().len(),
            "Invoking language model"
        );

        let reply = self.model.complete(&messages).await?;
        if reply.trim().is_empty() {
            return Err(EngineError::EmptyReply);
        }
        Ok(reply)
    }
}
