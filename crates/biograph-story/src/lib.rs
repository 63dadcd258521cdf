//! Narrated story generation for Biograph.
//!
//! Reuses the grounded answer engine in one-shot mode, turns the narrative
//! into speech and stores it as a timestamped WAV file.

pub mod narrative;
pub mod prompt;
pub mod speech;
pub mod wav;

pub use narrative::{NarrativeService, StoryArtifact, StoryOutcome, StoryRequest};
pub use speech::{HttpSpeechSynthesizer, MockSpeech, SpeechError, SpeechSynthesizer};
