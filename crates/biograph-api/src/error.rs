//! API error types and JSON error response formatting.
//!
//! Every error body has the shape `{ success: false, error, details? }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use biograph_chat::ChatError;
use biograph_story::StoryOutcome;
use serde::Serialize;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    /// Human-readable error message.
    pub error: String,
    /// Optional structured details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400 - missing or malformed input.
    #[error("{0}")]
    BadRequest(String),
    /// 400 - body failed schema validation; one entry per problem.
    #[error("Invalid request body")]
    InvalidBody(Vec<String>),
    /// 500 - the service is missing a credential or setting.
    #[error("{0}")]
    Configuration(String),
    /// 500 - a downstream call failed.
    #[error("{error}")]
    Failed {
        error: String,
        details: Option<serde_json::Value>,
    },
    /// 503 - component not configured.
    #[error("{0}")]
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::InvalidBody(problems) => (
                StatusCode::BAD_REQUEST,
                "Invalid request body".to_string(),
                Some(serde_json::json!(problems)),
            ),
            ApiError::Configuration(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            ApiError::Failed { error, details } => {
                (StatusCode::INTERNAL_SERVER_ERROR, error, details)
            }
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg, None),
        };

        let body = ErrorBody {
            success: false,
            error,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage | ChatError::MessageTooLong(_) => {
                ApiError::BadRequest(err.to_string())
            }
            ChatError::Configuration(msg) => ApiError::Configuration(msg),
            ChatError::Engine(e) => ApiError::Failed {
                error: "Failed to process message".to_string(),
                details: Some(serde_json::Value::String(e.to_string())),
            },
        }
    }
}

impl ApiError {
    /// Map a failed story outcome, carrying any salvaged narrative.
    pub fn from_story(outcome: &StoryOutcome) -> Self {
        let error = outcome.error().unwrap_or("Unknown error occurred").to_string();
        let details = outcome
            .narrative()
            .map(|narrative| serde_json::json!({ "narrative": narrative }));
        ApiError::Failed { error, details }
    }
}
