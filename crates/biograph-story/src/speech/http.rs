use std::time::Duration;

use async_trait::async_trait;
use biograph_core::config::SpeechConfig;
use serde_json::json;

use super::{SpeechError, SpeechSynthesizer};
use crate::wav;

/// JSON-over-HTTP speech client.
///
/// Posts `{text, speed, lang_code}` and accepts either a WAV body or raw
/// 16-bit mono PCM at `sample_rate`.
pub struct HttpSpeechSynthesizer {
    config: SpeechConfig,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpSpeechSynthesizer {
    /// Build from config, reading the key from `config.api_key_env` if set.
    pub fn from_config(config: SpeechConfig) -> Self {
        let api_key = if config.api_key_env.is_empty() {
            None
        } else {
            std::env::var(&config.api_key_env)
                .ok()
                .filter(|k| !k.trim().is_empty())
        };
        Self::new(config, api_key)
    }

    pub fn new(config: SpeechConfig, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });
        Self {
            config,
            api_key,
            client,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSpeechSynthesizer {
    fn name(&self) -> &str {
        "http"
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let payload = json!({
            "text": text,
            "speed": self.config.speed,
            "lang_code": self.config.lang_code,
        });

        let mut request = self.client.post(&self.config.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SpeechError::Timeout
            } else {
                SpeechError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Network(e.to_string()))?;
        if bytes.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        tracing::debug!(
            text_chars = text.chars().count(),
            audio_bytes = bytes.len(),
            "Speech synthesized"
        );
        Ok(wav::ensure_wav(bytes.to_vec(), self.config.sample_rate))
    }
}
