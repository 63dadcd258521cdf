//! Text-to-speech capability.
//!
//! [`SpeechSynthesizer`] takes text and returns WAV bytes.
//! [`HttpSpeechSynthesizer`] posts to a JSON TTS endpoint; [`MockSpeech`]
//! returns canned audio.

use async_trait::async_trait;
use biograph_core::BiographError;

pub mod http;
pub mod mock;

pub use http::HttpSpeechSynthesizer;
pub use mock::MockSpeech;

/// Errors from a speech synthesis call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpeechError {
    #[error("nothing to synthesize")]
    EmptyText,
    #[error("speech request timed out")]
    Timeout,
    #[error("speech network error: {0}")]
    Network(String),
    #[error("speech service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("speech service returned no audio")]
    EmptyAudio,
}

impl From<SpeechError> for BiographError {
    fn from(err: SpeechError) -> Self {
        BiographError::Synthesis(err.to_string())
    }
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn name(&self) -> &str;

    /// Synthesize `text` into a complete WAV file.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}
