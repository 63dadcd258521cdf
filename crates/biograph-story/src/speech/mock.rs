use std::sync::Mutex;

use async_trait::async_trait;

use super::{SpeechError, SpeechSynthesizer};
use crate::wav;

/// Canned speech for tests and offline runs.
pub struct MockSpeech {
    result: Result<Vec<u8>, SpeechError>,
    calls: Mutex<Vec<String>>,
}

impl MockSpeech {
    /// Always returns a short silent WAV.
    pub fn new() -> Self {
        Self::with_audio(wav::frame_pcm16(&[0u8; 64], 22_050))
    }

    pub fn with_audio(audio: Vec<u8>) -> Self {
        Self {
            result: Ok(audio),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always fails with `error`.
    pub fn failing(error: SpeechError) -> Self {
        Self {
            result: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Texts passed to each call so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl Default for MockSpeech {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeech {
    fn name(&self) -> &str {
        "mock"
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(text.to_string());
        }
        self.result.clone()
    }
}
