use super::state::AppState;
use crate::media::{CameraFacing, MediaMode};
use crate::session::{SessionError, SessionStatus};
use crate::snapshot::SnapshotError;
use crate::upload::ContentId;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SelectModeRequest {
    pub mode: MediaMode,
}

#[derive(Debug, Serialize)]
pub struct ToggleCameraResponse {
    pub facing: CameraFacing,
    pub status: SessionStatus,
}

#[derive(Debug, Serialize)]
pub struct StopRecordingResponse {
    pub status: String,
    pub blob_size: usize,
    pub chunks_count: usize,
    pub content_id: Option<ContentId>,
}

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub width: u32,
    pub height: u32,
    pub content_id: Option<ContentId>,
    pub data_url: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(err: SessionError) -> Response {
    let status = match &err {
        SessionError::Capture(_) => StatusCode::SERVICE_UNAVAILABLE,
        SessionError::Recorder(_) | SessionError::Busy => StatusCode::CONFLICT,
        SessionError::Snapshot(SnapshotError::NoFrame) => StatusCode::CONFLICT,
        SessionError::Snapshot(_) | SessionError::Encoder(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    error!("Request failed: {}", err);

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /session/status
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.lock().await;
    (StatusCode::OK, Json(session.status().await))
}

/// POST /session/mode
pub async fn select_mode(
    State(state): State<AppState>,
    Json(req): Json<SelectModeRequest>,
) -> Response {
    let mut session = state.session.lock().await;

    match session.select_mode(req.mode).await {
        Ok(()) => (StatusCode::OK, Json(session.status().await)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /capture/start
pub async fn start_capture(State(state): State<AppState>) -> Response {
    let mut session = state.session.lock().await;

    match session.start_capture().await {
        Ok(()) => (StatusCode::OK, Json(session.status().await)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /capture/toggle
pub async fn toggle_camera(State(state): State<AppState>) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    session.toggle_camera().await;

    (
        StatusCode::OK,
        Json(ToggleCameraResponse {
            facing: session.capture().facing(),
            status: session.status().await,
        }),
    )
}

/// POST /record/start
pub async fn start_recording(State(state): State<AppState>) -> Response {
    let mut session = state.session.lock().await;

    match session.start_recording().await {
        Ok(()) => {
            info!("Recording started via HTTP");
            (StatusCode::OK, Json(session.status().await)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST /record/stop
/// Responds after the upload has resolved and the session was reset
pub async fn stop_recording(State(state): State<AppState>) -> Response {
    let mut session = state.session.lock().await;

    match session.stop_recording().await {
        Ok(Some(outcome)) => (
            StatusCode::OK,
            Json(StopRecordingResponse {
                status: if outcome.content_id.is_some() {
                    "uploaded".to_string()
                } else {
                    "upload_failed".to_string()
                },
                blob_size: outcome.blob_size,
                chunks_count: outcome.chunks_count,
                content_id: outcome.content_id,
            }),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "not recording".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /snapshot
pub async fn take_snapshot(State(state): State<AppState>) -> Response {
    let mut session = state.session.lock().await;

    match session.take_snapshot().await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(SnapshotResponse {
                width: outcome.snapshot.width,
                height: outcome.snapshot.height,
                data_url: outcome.snapshot.data_url(),
                content_id: outcome.content_id,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /session/reset
pub async fn reset_session(State(state): State<AppState>) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    session.reset().await;
    (StatusCode::OK, Json(session.status().await))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
