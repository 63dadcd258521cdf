//! Error types for the conversational layer.

use biograph_core::BiographError;

use crate::engine::EngineError;

/// Errors from a chat exchange.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("{0}")]
    Configuration(String),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

impl From<ChatError> for BiographError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage | ChatError::MessageTooLong(_) => {
                BiographError::Validation(err.to_string())
            }
            ChatError::Configuration(msg) => BiographError::Config(msg),
            ChatError::Engine(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyMessage.to_string(), "message cannot be empty");
        assert_eq!(
            ChatError::MessageTooLong(4000).to_string(),
            "message exceeds maximum length of 4000 characters"
        );
        assert_eq!(
            ChatError::Configuration("DEEPSEEK_API_KEY not configured".to_string()).to_string(),
            "DEEPSEEK_API_KEY not configured"
        );
        assert_eq!(
            ChatError::Engine(EngineError::EmptyReply).to_string(),
            "engine error: model returned an empty reply"
        );
    }

    #[test]
    fn test_chat_error_into_biograph_error() {
        let err: BiographError = ChatError::EmptyMessage.into();
        assert!(matches!(err, BiographError::Validation(_)));

        let err: BiographError = ChatError::Configuration("missing".to_string()).into();
        assert!(matches!(err, BiographError::Config(_)));

        let err: BiographError =
            ChatError::Engine(EngineError::Model(LlmError::Timeout)).into();
        assert!(matches!(err, BiographError::Engine(_)));
    }
}
