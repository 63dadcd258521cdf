//! Narrative prompts.

/// Guidelines that replace the question-answering block in narrative mode.
pub const NARRATIVE_INSTRUCTIONS: &str = "- Use only the information provided above
- Write flowing prose meant to be read aloud
- Do not use headings, lists, markup or emoji
- Do not ask follow-up questions";

/// The storytelling request for `subject`.
pub fn narrative_prompt(subject: &str) -> String {
    format!(
        "Create a story about {} covering their background, career highlights, and personal interests. \
Use narrative storytelling format, not Q&A. Make it engaging and coherent.",
        subject
    )
}

/// Full message sent to the engine for one story.
///
/// A blank custom prompt is left out.
pub fn story_message(subject: &str, custom_prompt: Option<&str>, length: usize) -> String {
    let mut parts = vec![narrative_prompt(subject)];
    if let Some(custom) = custom_prompt.map(str::trim).filter(|c| !c.is_empty()) {
        parts.push(custom.to_string());
    }
    parts.push(format!(
        "IMPORTANT that narrative is no longer than {} Characters",
        length
    ));
    parts.join("\n\n")
}
