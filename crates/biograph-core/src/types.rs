use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Conversation turns
// =============================================================================

/// Who produced a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Human,
    System,
    Assistant,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::Human => write!(f, "human"),
            Speaker::System => write!(f, "system"),
            Speaker::Assistant => write!(f, "assistant"),
        }
    }
}

/// One utterance in a conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

impl Turn {
    pub fn human(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Human,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::System,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }
}

// =============================================================================
// Corpus
// =============================================================================

/// A single biographical source document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// File name or last URL segment.
    pub name: String,
    pub content: String,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Render with its identity header: `--- name ---\ncontent`.
    pub fn render(&self) -> String {
        format!("--- {} ---\n{}", self.name, self.content)
    }
}

/// The concatenated corpus embedded into every system prompt.
///
/// Immutable once built. When no documents could be loaded it holds a
/// sentinel message instead, so prompts stay well-formed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorpusContext {
    text: String,
    document_count: usize,
}

impl CorpusContext {
    /// Join documents in order, separated by a blank line.
    ///
    /// An empty slice yields the generic "no documents" sentinel.
    pub fn from_documents(documents: &[Document]) -> Self {
        if documents.is_empty() {
            return Self::sentinel("No documents found.");
        }
        let text = documents
            .iter()
            .map(Document::render)
            .collect::<Vec<_>>()
            .join("\n\n");
        Self {
            text,
            document_count: documents.len(),
        }
    }

    /// A context carrying only a placeholder message.
    pub fn sentinel(message: impl Into<String>) -> Self {
        Self {
            text: message.into(),
            document_count: 0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn document_count(&self) -> usize {
        self.document_count
    }

    /// True when built from a placeholder rather than real documents.
    pub fn is_sentinel(&self) -> bool {
        self.document_count == 0
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

impl fmt::Display for CorpusContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
