use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::capture::CaptureError;
use crate::memos::{MemoDraft, MemoError, MemoPatch};
use crate::recorder::StartRequest;

use super::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct StartRecordingRequest {
    /// Recognition language override, e.g. "en-US"
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecorderCommandResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RecorderStatusResponse {
    pub is_recording: bool,
    pub is_processing: bool,
    pub transcript: String,
    pub final_transcript: String,

    /// Size of the last finalized clip, if one exists
    pub audio_bytes: Option<usize>,

    pub alert: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Recorder Handlers
// ============================================================================

/// POST /recorder/start
/// Start a recording session, superseding any session in progress
pub async fn start_recording(
    State(state): State<AppState>,
    body: Option<Json<StartRecordingRequest>>,
) -> impl IntoResponse {
    let request = body.map(|Json(b)| b).unwrap_or_default();

    match state
        .recorder
        .start(StartRequest {
            language: request.language,
        })
        .await
    {
        Ok(_completion) => (
            StatusCode::OK,
            Json(RecorderCommandResponse {
                status: "recording".to_string(),
                message: "Recording started".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to start recording: {}", e);
            let status = match e {
                CaptureError::PermissionDenied => StatusCode::FORBIDDEN,
                CaptureError::NoDevice => StatusCode::SERVICE_UNAVAILABLE,
                CaptureError::Device(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(ErrorResponse {
                    error: format!("Failed to start recording: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// POST /recorder/stop
/// Stop the session in progress; finalization completes asynchronously
pub async fn stop_recording(State(state): State<AppState>) -> impl IntoResponse {
    state.recorder.stop().await;
    (
        StatusCode::OK,
        Json(RecorderCommandResponse {
            status: "stopping".to_string(),
            message: "Recording stopped; clip finalizing".to_string(),
        }),
    )
}

/// GET /recorder/status
/// Current recorder snapshot
pub async fn recorder_status(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.recorder.snapshot();
    Json(RecorderStatusResponse {
        is_recording: snapshot.is_recording,
        is_processing: snapshot.is_processing,
        transcript: snapshot.transcript,
        final_transcript: snapshot.final_transcript,
        audio_bytes: snapshot.audio.as_ref().map(|clip| clip.data.len()),
        alert: snapshot.alert,
    })
}

/// GET /recorder/audio
/// Raw bytes of the last finalized clip
pub async fn recorder_audio(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.recorder.snapshot();
    match snapshot.audio {
        Some(clip) => {
            ([(header::CONTENT_TYPE, clip.mime_type)], clip.data).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No finalized recording available".to_string(),
            }),
        )
            .into_response(),
    }
}

// ============================================================================
// Memo Handlers
// ============================================================================

/// GET /memos
/// List all memos, newest first
pub async fn list_memos(State(state): State<AppState>) -> impl IntoResponse {
    match state.memos.get_all_memos().await {
        Ok(memos) => (StatusCode::OK, Json(memos)).into_response(),
        Err(e) => memo_error_response(e),
    }
}

/// POST /memos
/// Create a memo
pub async fn create_memo(
    State(state): State<AppState>,
    Json(draft): Json<MemoDraft>,
) -> impl IntoResponse {
    match state.memos.create_memo(draft).await {
        Ok(memo) => (StatusCode::CREATED, Json(memo)).into_response(),
        Err(e) => memo_error_response(e),
    }
}

/// GET /memos/:id
pub async fn get_memo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.memos.get_memo(&id).await {
        Ok(memo) => (StatusCode::OK, Json(memo)).into_response(),
        Err(e) => memo_error_response(e),
    }
}

/// PUT /memos/:id
/// Patch a memo; absent fields keep their stored values
pub async fn update_memo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<MemoPatch>,
) -> impl IntoResponse {
    match state.memos.update_memo(&id, patch).await {
        Ok(memo) => (StatusCode::OK, Json(memo)).into_response(),
        Err(e) => memo_error_response(e),
    }
}

/// DELETE /memos/:id
pub async fn delete_memo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.memos.delete_memo(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => memo_error_response(e),
    }
}

// ============================================================================
// Health Check
// ============================================================================

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

fn memo_error_response(e: MemoError) -> Response {
    let status = match &e {
        MemoError::NotFound => StatusCode::NOT_FOUND,
        MemoError::InvalidId
        | MemoError::TitleRequired
        | MemoError::DescriptionRequired
        | MemoError::TitleEmpty
        | MemoError::DescriptionEmpty => StatusCode::BAD_REQUEST,
        MemoError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Memo operation failed: {}", e);
    }
    (status, Json(ErrorResponse { error: e.to_string() })).into_response()
}
