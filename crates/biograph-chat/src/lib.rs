//! Conversational layer for Biograph.
//!
//! Turns a user's question into a reply grounded in the biographical corpus,
//! and keeps per-session transcripts consistent across turns.

pub mod context;
pub mod engine;
pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod profiler;
pub mod prompt;
pub mod session;

pub use context::HistoryWindow;
pub use engine::{AnswerEngine, EngineError};
pub use error::ChatError;
pub use llm::{LanguageModel, LlmError, MockModel, OpenAiCompatibleModel};
pub use orchestrator::{ChatReply, ChatService};
pub use profiler::Profiler;
pub use prompt::{AnswerOptions, PromptBundle};
pub use session::{ExchangeGate, Session, SessionStore, SessionSummary};
