//! Route handler functions for all API endpoints.
//!
//! JSON bodies are taken as raw values and checked by hand so malformed
//! input gets the same `{ success: false, error }` shape as every other
//! error, instead of axum's plain-text rejection.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use biograph_chat::SessionSummary;
use biograph_core::Turn;
use biograph_story::{StoryOutcome, StoryRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub session_id: String,
    pub turns: Vec<Turn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryResponse {
    pub success: bool,
    pub narrative: String,
    pub audio_path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfilerResponse {
    pub success: bool,
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub sessions: usize,
    pub corpus_chars: usize,
}

// =============================================================================
// Body parsing
// =============================================================================

const MESSAGE_REQUIRED: &str = "Message is required and must be a string";

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Non-empty string `message` field.
fn message_field(body: &Value) -> Result<&str, ApiError> {
    match body.get("message").and_then(Value::as_str) {
        Some(message) if !message.is_empty() => Ok(message),
        _ => Err(ApiError::BadRequest(MESSAGE_REQUIRED.to_string())),
    }
}

/// Parse and validate a story body, collecting every problem.
fn story_request(body: &Value, min_length: usize) -> Result<StoryRequest, ApiError> {
    let mut problems = Vec::new();

    let length = match body.get("length") {
        None | Some(Value::Null) => {
            problems.push("length: Required".to_string());
            None
        }
        Some(value) => match value.as_f64() {
            Some(n) if n.is_finite() && n >= 0.0 => Some(n as usize),
            Some(_) => {
                problems.push(format!(
                    "length: must be greater than or equal to {}",
                    min_length
                ));
                None
            }
            None => {
                problems.push("length: Expected number".to_string());
                None
            }
        },
    };

    let custom_prompt = match body.get("customPrompt") {
        None | Some(Value::Null) => None,
        Some(Value::String(prompt)) => Some(prompt.clone()),
        Some(_) => {
            problems.push("customPrompt: Expected string".to_string());
            None
        }
    };

    let request = length.map(|length| StoryRequest {
        length,
        custom_prompt,
    });
    if let Some(request) = &request {
        problems.extend(request.validate(min_length));
    }

    match request {
        Some(request) if problems.is_empty() => Ok(request),
        _ => Err(ApiError::InvalidBody(problems)),
    }
}

// =============================================================================
// Chat
// =============================================================================

/// POST /chat - one grounded exchange on a (possibly new) session.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let body = json_body(payload)?;
    let message = message_field(&body)?;
    let session_id = body.get("sessionId").and_then(Value::as_str);

    let reply = state.chat.send(session_id, message).await.map_err(|e| {
        tracing::error!(error = %e, "Error in chat");
        ApiError::from(e)
    })?;

    Ok(Json(ChatResponse {
        success: true,
        response: reply.response,
        session_id: reply.session_id,
    }))
}

/// GET /chat/{session_id}/history - transcript, empty for unknown ids.
pub async fn chat_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<HistoryResponse> {
    let turns = state.chat.history(&session_id);
    Json(HistoryResponse { session_id, turns })
}

/// DELETE /chat/{session_id} - idempotent session teardown.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<DeleteResponse> {
    let deleted = state.chat.clear(&session_id);
    tracing::info!(session_id = %session_id, deleted, "Session delete requested");
    Json(DeleteResponse {
        success: true,
        deleted,
    })
}

/// GET /sessions - active sessions, most recent first.
pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionsResponse> {
    Json(SessionsResponse {
        sessions: state.chat.store().list(),
    })
}

// =============================================================================
// Story
// =============================================================================

/// POST /story - narrate the corpus and store the audio.
pub async fn story(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<StoryResponse>, ApiError> {
    let body = json_body(payload)?;
    let request = story_request(&body, state.config.story.min_length)?;

    match state.story.generate(&request).await {
        StoryOutcome::Ok(artifact) => Ok(Json(StoryResponse {
            success: true,
            narrative: artifact.narrative,
            audio_path: artifact.audio_path,
        })),
        failed => {
            tracing::error!(error = ?failed.error(), "Story generation failed");
            Err(ApiError::from_story(&failed))
        }
    }
}

// =============================================================================
// Profiler
// =============================================================================

/// POST /profiler - stateless answer over the URL corpus.
pub async fn profiler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ProfilerResponse>, ApiError> {
    let profiler = state.profiler.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable("Profiler corpus is not configured".to_string())
    })?;
    let body = json_body(payload)?;
    let message = message_field(&body)?;

    let response = profiler.ask(message).await?;
    Ok(Json(ProfilerResponse {
        success: true,
        response,
    }))
}

// =============================================================================
// Health
// =============================================================================

/// GET /health - liveness plus a few counters.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        sessions: state.chat.store().len(),
        corpus_chars: state.chat.context().char_len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_field() {
        assert_eq!(message_field(&json!({"message": "hi"})).unwrap(), "hi");
        assert!(message_field(&json!({})).is_err());
        assert!(message_field(&json!({"message": ""})).is_err());
        assert!(message_field(&json!({"message": 42})).is_err());
    }

    #[test]
    fn test_story_request_valid() {
        let req = story_request(&json!({"length": 300, "customPrompt": "Be brief."}), 100).unwrap();
        assert_eq!(req.length, 300);
        assert_eq!(req.custom_prompt.as_deref(), Some("Be brief."));
    }

    #[test]
    fn test_story_request_too_short() {
        match story_request(&json!({"length": 50}), 100) {
            Err(ApiError::InvalidBody(problems)) => {
                assert_eq!(
                    problems,
                    vec!["length: must be greater than or equal to 100".to_string()]
                );
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_story_request_collects_all_problems() {
        match story_request(&json!({"length": "long", "customPrompt": 1}), 100) {
            Err(ApiError::InvalidBody(problems)) => assert_eq!(problems.len(), 2),
            other => panic!("unexpected: {:?}", other),
        }
        match story_request(&json!({}), 100) {
            Err(ApiError::InvalidBody(problems)) => {
                assert_eq!(problems, vec!["length: Required".to_string()])
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_story_request_negative_length() {
        assert!(matches!(
            story_request(&json!({"length": -5}), 100),
            Err(ApiError::InvalidBody(_))
        ));
    }
}
