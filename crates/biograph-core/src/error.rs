use thiserror::Error;

/// Top-level error type for the Biograph system.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for BiographError` where they need to cross a crate
/// boundary with `?`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BiographError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Speech synthesis error: {0}")]
    Synthesis(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for BiographError {
    fn from(err: toml::de::Error) -> Self {
        BiographError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for BiographError {
    fn from(err: toml::ser::Error) -> Self {
        BiographError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for BiographError {
    fn from(err: serde_json::Error) -> Self {
        BiographError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Biograph operations.
pub type Result<T> = std::result::Result<T, BiographError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let cases: Vec<(BiographError, &str)> = vec![
            (
                BiographError::Config("missing key".to_string()),
                "Configuration error: missing key",
            ),
            (
                BiographError::Corpus("fetch failed".to_string()),
                "Corpus error: fetch failed",
            ),
            (
                BiographError::Engine("model timeout".to_string()),
                "Engine error: model timeout",
            ),
            (
                BiographError::Synthesis("no audio".to_string()),
                "Speech synthesis error: no audio",
            ),
            (
                BiographError::Validation("length too small".to_string()),
                "Validation error: length too small",
            ),
            (
                BiographError::Api("bind failed".to_string()),
                "API error: bind failed",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BiographError = io_err.into();
        assert!(matches!(err, BiographError::Io(_)));
        assert!(err.to_string().starts_with("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let err: std::result::Result<toml::Value, _> = toml::from_str("invalid = [[[");
        let err: BiographError = err.unwrap_err().into();
        assert!(matches!(err, BiographError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope }");
        let err: BiographError = err.unwrap_err().into();
        assert!(matches!(err, BiographError::Serialization(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let value = io_result?;
            Ok(value.to_string())
        }

        assert_eq!(inner().unwrap(), "42");
    }
}
