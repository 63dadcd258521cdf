//! Narrative service: one-shot story, spoken and saved.
//!
//! Flow: engine (empty history, narrative guidelines) -> speech -> WAV file
//! under the audio directory. Each stage's failure is reported separately,
//! keeping the narrative whenever it was produced.

use std::path::PathBuf;
use std::sync::Arc;

use biograph_chat::{AnswerEngine, AnswerOptions};
use biograph_core::config::StoryConfig;
use biograph_core::{generate_filename, CorpusContext};

use crate::prompt::{story_message, NARRATIVE_INSTRUCTIONS};
use crate::speech::SpeechSynthesizer;

/// A story request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoryRequest {
    /// Character budget for the narrative.
    pub length: usize,
    pub custom_prompt: Option<String>,
}

impl StoryRequest {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            custom_prompt: None,
        }
    }

    pub fn with_custom_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.custom_prompt = Some(prompt.into());
        self
    }

    /// Problems with the request; empty when valid.
    pub fn validate(&self, min_length: usize) -> Vec<String> {
        let mut problems = Vec::new();
        if self.length < min_length {
            problems.push(format!(
                "length: must be greater than or equal to {}",
                min_length
            ));
        }
        problems
    }
}

/// A stored story.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoryArtifact {
    pub narrative: String,
    /// Public path, e.g. `/tts-audio/story-2024-05-01T10-20-30-123Z.wav`.
    pub audio_path: String,
    /// Where the file was written on disk.
    pub file_path: PathBuf,
}

/// Result of [`NarrativeService::generate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoryOutcome {
    Ok(StoryArtifact),
    EngineFailed(String),
    SynthesisFailed { narrative: String, error: String },
    WriteFailed { narrative: String, error: String },
}

impl StoryOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, StoryOutcome::Ok(_))
    }

    /// The narrative, if one was produced.
    pub fn narrative(&self) -> Option<&str> {
        match self {
            StoryOutcome::Ok(artifact) => Some(&artifact.narrative),
            StoryOutcome::EngineFailed(_) => None,
            StoryOutcome::SynthesisFailed { narrative, .. }
            | StoryOutcome::WriteFailed { narrative, .. } => Some(narrative),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            StoryOutcome::Ok(_) => None,
            StoryOutcome::EngineFailed(error)
            | StoryOutcome::SynthesisFailed { error, .. }
            | StoryOutcome::WriteFailed { error, .. } => Some(error),
        }
    }
}

pub struct NarrativeService {
    engine: AnswerEngine,
    speech: Arc<dyn SpeechSynthesizer>,
    context: Arc<CorpusContext>,
    config: StoryConfig,
}

impl NarrativeService {
    pub fn new(
        engine: AnswerEngine,
        speech: Arc<dyn SpeechSynthesizer>,
        context: Arc<CorpusContext>,
        config: StoryConfig,
    ) -> Self {
        Self {
            engine,
            speech,
            context,
            config,
        }
    }

    pub fn config(&self) -> &StoryConfig {
        &self.config
    }

    /// Generate, speak and store one story.
    pub async fn generate(&self, request: &StoryRequest) -> StoryOutcome {
        if let Err(e) = self.engine.check_configured() {
            return StoryOutcome::EngineFailed(e.to_string());
        }

        let message = story_message(
            &self.config.subject,
            request.custom_prompt.as_deref(),
            request.length,
        );
        let options = AnswerOptions {
            max_response_chars: request.length,
            instructions: Some(NARRATIVE_INSTRUCTIONS.to_string()),
        };

        let narrative = match self.engine.answer(&self.context, &message, &[], &options).await {
            Ok(narrative) => narrative,
            Err(e) => {
                tracing::warn!(error = %e, "Story narrative generation failed");
                return StoryOutcome::EngineFailed(e.to_string());
            }
        };

        let audio = match self.speech.synthesize(&narrative).await {
            Ok(audio) => audio,
            Err(e) => {
                tracing::warn!(speech = %self.speech.name(), error = %e, "Story synthesis failed");
                return StoryOutcome::SynthesisFailed {
                    narrative,
                    error: e.to_string(),
                };
            }
        };

        let filename = generate_filename("story", "wav");
        let dir = PathBuf::from(&self.config.audio_dir);
        let file_path = dir.join(&filename);

        let written = async {
            tokio::fs::create_dir_all(&dir).await?;
            tokio::fs::write(&file_path, &audio).await
        }
        .await;
        if let Err(e) = written {
            tracing::error!(path = %file_path.display(), error = %e, "Failed to write story audio");
            return StoryOutcome::WriteFailed {
                narrative,
                error: e.to_string(),
            };
        }

        let audio_path = format!(
            "{}/{}",
            self.config.public_prefix.trim_end_matches('/'),
            filename
        );
        tracing::info!(
            narrative_chars = narrative.chars().count(),
            audio_bytes = audio.len(),
            audio_path = %audio_path,
            "Story generated"
        );

        StoryOutcome::Ok(StoryArtifact {
            narrative,
            audio_path,
            file_path,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
