//! Chat service: central coordinator wiring the session store and the engine.
//!
//! One exchange is: snapshot history, record the question, ask the engine,
//! record the reply. Exchanges on the same session id are serialized by the
//! session's gate; different ids run concurrently.

use std::sync::Arc;

use biograph_core::config::ChatConfig;
use biograph_core::{CorpusContext, Turn};
use uuid::Uuid;

use crate::context::HistoryWindow;
use crate::engine::AnswerEngine;
use crate::error::ChatError;
use crate::prompt::AnswerOptions;
use crate::session::SessionStore;

/// Result of one successful exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatReply {
    /// The id the exchange ran under (generated on first contact).
    pub session_id: String,
    pub response: String,
    /// Transcript of the session the exchange ran on, ending with this reply.
    pub transcript: Vec<Turn>,
}

/// Orchestrates grounded multi-turn conversations.
pub struct ChatService {
    engine: AnswerEngine,
    store: Arc<SessionStore>,
    context: Arc<CorpusContext>,
    window: HistoryWindow,
    options: AnswerOptions,
    max_message_chars: usize,
}

impl ChatService {
    pub fn new(
        engine: AnswerEngine,
        store: Arc<SessionStore>,
        context: Arc<CorpusContext>,
        config: &ChatConfig,
    ) -> Self {
        Self {
            engine,
            store,
            context,
            window: HistoryWindow::new(config.max_history_turns),
            options: AnswerOptions::with_max_response_chars(config.max_response_chars),
            max_message_chars: config.max_message_chars,
        }
    }

    /// Handle an incoming chat message.
    ///
    /// A missing or blank `session_id` starts a new session with a fresh id.
    /// If the engine fails, the question stays recorded without a reply.
    pub async fn send(
        &self,
        session_id: Option<&str>,
        message: &str,
    ) -> Result<ChatReply, ChatError> {
        // Validate message
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if message.chars().count() > self.max_message_chars {
            return Err(ChatError::MessageTooLong(self.max_message_chars));
        }
        self.engine
            .check_configured()
            .map_err(|e| ChatError::Configuration(e.to_string()))?;

        let sid = match session_id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };

        // Get or create session, then hold its gate for the whole exchange.
        // A session deleted while we waited is registered afresh.
        let (gate, _exchange) = loop {
            let gate = self.store.gate(&sid);
            let guard = Arc::clone(&gate).lock_owned().await;
            if self.store.is_current(&sid, &gate) {
                break (gate, guard);
            }
        };

        // Snapshot before recording the new question so it is not duplicated
        let mut transcript = self.store.history(&sid);
        let history = self.window.apply(&transcript);
        self.store.append_if(&sid, &gate, Turn::human(message));

        let response = match self
            .engine
            .answer(&self.context, message, &history, &self.options)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(session_id = %sid, error = %e, "Chat engine call failed");
                return Err(e.into());
            }
        };

        if !self
            .store
            .append_if(&sid, &gate, Turn::assistant(response.clone()))
        {
            tracing::info!(
                session_id = %sid,
                "Session removed during exchange; reply not recorded"
            );
        }
        tracing::info!(
            session_id = %sid,
            history_turns = history.len(),
            reply_chars = response.chars().count(),
            "Chat exchange completed"
        );

        transcript.push(Turn::human(message));
        transcript.push(Turn::assistant(response.clone()));
        Ok(ChatReply {
            session_id: sid,
            response,
            transcript,
        })
    }

    /// Transcript for a session; empty if unknown.
    pub fn history(&self, session_id: &str) -> Vec<Turn> {
        self.store.history(session_id)
    }

    /// Delete a session. Returns whether it existed.
    pub fn clear(&self, session_id: &str) -> bool {
        self.store.delete(session_id)
    }

    /// The loaded corpus (for debugging).
    pub fn context(&self) -> &CorpusContext {
        &self.context
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }
}

// =============================================================================
// Tests
// =============================================================================
