//! Stateless question answering over a separately loaded corpus.
//!
//! Unlike [`ChatService`](crate::ChatService) there is no session: every
//! question is answered on its own, with no history.

use std::sync::Arc;

use biograph_core::CorpusContext;

use crate::engine::AnswerEngine;
use crate::error::ChatError;
use crate::prompt::AnswerOptions;

pub struct Profiler {
    engine: AnswerEngine,
    context: Arc<CorpusContext>,
    options: AnswerOptions,
}

impl Profiler {
    pub fn new(engine: AnswerEngine, context: Arc<CorpusContext>, options: AnswerOptions) -> Self {
        Self {
            engine,
            context,
            options,
        }
    }

    /// Answer a single question from the profiler corpus.
    pub async fn ask(&self, message: &str) -> Result<String, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        self.engine
            .check_configured()
            .map_err(|e| ChatError::Configuration(e.to_string()))?;

        let reply = self
            .engine
            .answer(&self.context, message, &[], &self.options)
            .await?;
        tracing::debug!(reply_chars = reply.chars().count(), "Profiler answered");
        Ok(reply)
    }

    pub fn context(&self) -> &CorpusContext {
        &self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, MockModel};
    use biograph_core::{Document, Turn};

    fn profiler(model: Arc<MockModel>) -> Profiler {
        let context = CorpusContext::from_documents(&[Document::new(
            "career.md",
            "Worked as a ferry captain.",
        )]);
        Profiler::new(
            AnswerEngine::new(model),
            Arc::new(context),
            AnswerOptions::default(),
        )
    }

    #[tokio::test]
    async fn test_ask_sends_no_history() {
        let model = Arc::new(MockModel::new("A ferry captain."));
        let p = profiler(model.clone());

        assert_eq!(p.ask("What was the job?").await.unwrap(), "A ferry captain.");
        p.ask("And before?").await.unwrap();

        let calls = model.calls();
        assert_eq!(calls[1].len(), 2);
        assert!(calls[1][0].text.contains("ferry captain"));
        assert_eq!(calls[1][1], Turn::human("And before?"));
    }

    #[tokio::test]
    async fn test_ask_rejects_blank_message() {
        let model = Arc::new(MockModel::new("x"));
        let p = profiler(model.clone());
        assert_eq!(p.ask("").await, Err(ChatError::EmptyMessage));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_ask_unconfigured() {
        let p = profiler(Arc::new(MockModel::unconfigured()));
        assert!(matches!(
            p.ask("hi").await,
            Err(ChatError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_ask_engine_failure() {
        let model = Arc::new(MockModel::new("x"));
        model.push(Err(LlmError::RateLimited));
        let p = profiler(model);
        assert!(matches!(p.ask("hi").await, Err(ChatError::Engine(_))));
    }
}
