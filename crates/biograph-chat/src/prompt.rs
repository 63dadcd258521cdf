//! Prompt assembly.
//!
//! Pure functions from (corpus, instructions, history, message) to the
//! ordered message list sent to the model. Nothing here touches the network.

use biograph_core::{CorpusContext, Turn};

/// Default reply length budget, in characters.
pub const DEFAULT_MAX_RESPONSE_CHARS: usize = 250;

/// Per-call knobs for the answer engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOptions {
    /// Reply length budget communicated to the model. Not enforced.
    pub max_response_chars: usize,
    /// Replaces the question-answering guidelines when set.
    pub instructions: Option<String>,
}

impl Default for AnswerOptions {
    fn default() -> Self {
        Self {
            max_response_chars: DEFAULT_MAX_RESPONSE_CHARS,
            instructions: None,
        }
    }
}

impl AnswerOptions {
    pub fn with_max_response_chars(max_response_chars: usize) -> Self {
        Self {
            max_response_chars,
            instructions: None,
        }
    }
}

/// Render the guidelines used for interactive question answering.
pub fn qa_instructions(max_response_chars: usize) -> String {
    format!(
        "- Answer questions based only on the information provided above
- Be conversational and friendly
- If asked about something not in the documents, politely say you don't have that information
- Keep responses extremely concise but informative
- Keep response character length within {} characters, unless the prompt explicitly said otherwise
- You can ask follow-up questions to better understand what the user wants to know",
        max_response_chars
    )
}

/// Build the system instruction embedding the corpus verbatim.
pub fn system_prompt(context: &CorpusContext, options: &AnswerOptions) -> String {
    let instructions = match &options.instructions {
        Some(custom) => custom.clone(),
        None => qa_instructions(options.max_response_chars),
    };
    format!(
        "You are a helpful AI assistant that answers questions about a person based on the provided information.

Here is the information about the person:

{}

Instructions:
{}",
        context.as_str(),
        instructions
    )
}

/// Everything sent to the model for one call. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptBundle {
    system_prompt: String,
    history: Vec<Turn>,
    user_message: String,
}

impl PromptBundle {
    pub fn new(
        context: &CorpusContext,
        message: &str,
        history: &[Turn],
        options: &AnswerOptions,
    ) -> Self {
        Self {
            system_prompt: system_prompt(context, options),
            history: history.to_vec(),
            user_message: message.to_string(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    /// `[system, ...history, human(message)]`, history in original order.
    pub fn messages(&self) -> Vec<Turn> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(Turn::system(self.system_prompt.clone()));
        messages.extend(self.history.iter().cloned());
        messages.push(Turn::human(self.user_message.clone()));
        messages
    }
}
