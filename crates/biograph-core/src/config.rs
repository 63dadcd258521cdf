use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BiographError, Result};

/// Top-level configuration for the Biograph service.
///
/// Loaded from `./biograph.toml` unless `--config` or `BIOGRAPH_CONFIG` names
/// another file. Every section falls back to its defaults, so a partial file
/// is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BiographConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub story: StoryConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl BiographConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BiographConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, using defaults if the file does
    /// not exist. A file that exists but is invalid is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values that would make the service misbehave at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.chat.max_response_chars == 0 {
            return Err(BiographError::Config(
                "chat.max_response_chars must be greater than zero".to_string(),
            ));
        }
        if self.chat.max_message_chars == 0 {
            return Err(BiographError::Config(
                "chat.max_message_chars must be greater than zero".to_string(),
            ));
        }
        if self.chat.max_sessions == 0 {
            return Err(BiographError::Config(
                "chat.max_sessions must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(BiographError::Config(format!(
                "llm.temperature must be within 0.0..=2.0, got {}",
                self.llm.temperature
            )));
        }
        if !self.story.public_prefix.starts_with('/')
            || self.story.public_prefix.trim_end_matches('/').is_empty()
        {
            return Err(BiographError::Config(format!(
                "story.public_prefix must be a path below '/', got '{}'",
                self.story.public_prefix
            )));
        }
        Ok(())
    }
}

/// General process settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Address the HTTP server binds to.
    pub bind_address: String,
    /// HTTP server port.
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            bind_address: "127.0.0.1".to_string(),
            port: 3030,
        }
    }
}

/// Where the biographical documents come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Directory scanned for documents backing `/chat` and `/story`.
    pub dir: String,
    /// File extensions (without the dot) accepted from `dir`.
    pub extensions: Vec<String>,
    /// Remote documents backing `/profiler`. Empty disables the endpoint.
    pub urls: Vec<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            dir: "public/portfolio".to_string(),
            extensions: vec!["txt".to_string(), "md".to_string()],
            urls: Vec::new(),
        }
    }
}

/// Language model endpoint (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com".to_string(),
            model: "deepseek-chat".to_string(),
            temperature: 0.7,
            api_key_env: "DEEPSEEK_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Conversational behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Target reply length communicated to the model, in characters.
    pub max_response_chars: usize,
    /// Upper bound on prior turns passed to the model. `0` sends no history.
    ///
    /// The window never opens on an assistant reply, so after whole
    /// exchanges an odd value sends one turn fewer and `1` sends none.
    pub max_history_turns: usize,
    /// Longest accepted user message, in characters.
    pub max_message_chars: usize,
    /// Registry capacity; the least recently active session is evicted beyond it.
    pub max_sessions: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_response_chars: 250,
            max_history_turns: 20,
            max_message_chars: 4000,
            max_sessions: 10_000,
        }
    }
}

/// Text-to-speech endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub endpoint: String,
    /// Environment variable holding the API key. Empty means no auth header.
    pub api_key_env: String,
    pub speed: f32,
    pub lang_code: String,
    /// Sample rate assumed for raw 16-bit PCM responses.
    pub sample_rate: u32,
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5002/api/tts".to_string(),
            api_key_env: "NEUPHONIC_API_KEY".to_string(),
            speed: 1.15,
            lang_code: "en".to_string(),
            sample_rate: 22_050,
            timeout_secs: 120,
        }
    }
}

/// Narrated story generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    /// Who the story is about, as named in the narrative instruction.
    pub subject: String,
    /// Smallest `length` a story request may ask for.
    pub min_length: usize,
    /// Directory where generated audio is written.
    pub audio_dir: String,
    /// URL prefix the audio directory is served under.
    pub public_prefix: String,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            subject: "the person".to_string(),
            min_length: 100,
            audio_dir: "public/tts-audio".to_string(),
            public_prefix: "/tts-audio".to_string(),
        }
    }
}

/// HTTP server limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub rate_limit_per_sec: u64,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_sec: 20,
            body_limit_bytes: 64 * 1024,
        }
    }
}
