//! Error types for corpus loading.

use std::path::PathBuf;

use biograph_core::BiographError;

/// Errors from the strict (fail-fast) loading paths.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no corpus sources given")]
    Empty,
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<LoadError> for BiographError {
    fn from(err: LoadError) -> Self {
        BiographError::Corpus(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        assert_eq!(LoadError::Empty.to_string(), "no corpus sources given");

        let err = LoadError::Fetch {
            url: "https://example.com/bio.md".to_string(),
            reason: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch https://example.com/bio.md: connection refused"
        );

        let err = LoadError::Status {
            url: "https://example.com/bio.md".to_string(),
            status: 404,
        };
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[test]
    fn test_load_error_into_biograph_error() {
        let err: BiographError = LoadError::Empty.into();
        assert!(matches!(err, BiographError::Corpus(_)));
    }
}
