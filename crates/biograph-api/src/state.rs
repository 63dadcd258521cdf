//! Application state shared across all route handlers.
//!
//! AppState holds the services built once at start-up. It is passed to
//! handlers via axum's State extractor.

use std::sync::Arc;
use std::time::Instant;

use biograph_chat::{
    AnswerEngine, AnswerOptions, ChatService, LanguageModel, Profiler, SessionStore,
};
use biograph_core::{BiographConfig, CorpusContext};
use biograph_story::{NarrativeService, SpeechSynthesizer};

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration (read-only after start-up).
    pub config: Arc<BiographConfig>,
    /// Interactive, session-backed chat.
    pub chat: Arc<ChatService>,
    /// One-shot narrated stories.
    pub story: Arc<NarrativeService>,
    /// Stateless answers over the URL corpus, when one is configured.
    pub profiler: Option<Arc<Profiler>>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Wire the services around one model, one speech client and one corpus.
    pub fn new(
        config: BiographConfig,
        model: Arc<dyn LanguageModel>,
        speech: Arc<dyn SpeechSynthesizer>,
        context: CorpusContext,
    ) -> Self {
        let engine = AnswerEngine::new(model);
        let context = Arc::new(context);
        let store = Arc::new(SessionStore::new(config.chat.max_sessions));

        let chat = ChatService::new(engine.clone(), store, Arc::clone(&context), &config.chat);
        let story = NarrativeService::new(engine, speech, context, config.story.clone());

        Self {
            config: Arc::new(config),
            chat: Arc::new(chat),
            story: Arc::new(story),
            profiler: None,
            start_time: Instant::now(),
        }
    }

    /// Enable the profiler over a separately loaded corpus.
    pub fn with_profiler(mut self, model: Arc<dyn LanguageModel>, context: CorpusContext) -> Self {
        let options = AnswerOptions::with_max_response_chars(self.config.chat.max_response_chars);
        self.profiler = Some(Arc::new(Profiler::new(
            AnswerEngine::new(model),
            Arc::new(context),
            options,
        )));
        self
    }
}
