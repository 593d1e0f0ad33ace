use super::state::AppState;
use crate::capture::EncodedFrame;
use crate::media::MediaRef;
use crate::session::{BusyState, ConversationEntry, TurnError};
use crate::speech::{SpeechEvent, SpeechSegment};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct InterviewerTurnRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CandidateTurnResponse {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct InterviewerTurnResponse {
    pub media_ref: MediaRef,
    pub media_url: String,
}

#[derive(Debug, Serialize)]
pub struct SessionStateResponse {
    pub busy: BusyState,
    pub credential_ready: bool,
    pub camera_attached: bool,
}

#[derive(Debug, Serialize)]
pub struct LatestVideoResponse {
    pub media_ref: MediaRef,
    pub media_url: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectCredentialRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct CredentialResponse {
    pub ready: bool,
}

#[derive(Debug, Deserialize)]
pub struct CameraFrameRequest {
    /// Base64-encoded image bytes
    pub data: String,
    /// Defaults to image/jpeg
    pub mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpeechEventRequest {
    Results { segments: Vec<SpeechSegment> },
    Ended,
    Error { message: String },
}

#[derive(Debug, Serialize)]
pub struct SpeechEventAck {
    pub accepted: bool,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub listening: bool,
    pub locale: String,
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map a turn failure to a status plus the user-visible banner text
fn turn_error_response(e: TurnError) -> Response {
    let status = match &e {
        TurnError::EmptyInput => StatusCode::BAD_REQUEST,
        TurnError::MissingCredential | TurnError::CredentialInvalid(_) => StatusCode::UNAUTHORIZED,
        TurnError::SessionBusy => StatusCode::CONFLICT,
        TurnError::DeviceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        TurnError::Transport(_) => StatusCode::BAD_GATEWAY,
    };

    (status, Json(ErrorResponse { error: e.to_string() })).into_response()
}

// ============================================================================
// Session handlers
// ============================================================================

/// GET /session/log
/// Read-only snapshot of the conversation log
pub async fn get_log(State(state): State<AppState>) -> Json<Vec<ConversationEntry>> {
    Json(state.session.log_snapshot().await)
}

/// GET /session/state
pub async fn get_session_state(State(state): State<AppState>) -> Json<SessionStateResponse> {
    Json(SessionStateResponse {
        busy: state.session.busy_state(),
        credential_ready: state.credentials.is_ready().await,
        camera_attached: state.frames.is_attached().await,
    })
}

/// POST /session/turns/candidate
/// Run one candidate turn (sign → text)
pub async fn candidate_turn(State(state): State<AppState>) -> Response {
    match state.session.candidate_turn().await {
        Ok(text) => (StatusCode::OK, Json(CandidateTurnResponse { text })).into_response(),
        Err(e) => {
            error!("Candidate turn failed: {}", e);
            turn_error_response(e)
        }
    }
}

/// POST /session/turns/interviewer
/// Run one interviewer turn (text → video)
pub async fn interviewer_turn(
    State(state): State<AppState>,
    Json(req): Json<InterviewerTurnRequest>,
) -> Response {
    match state.session.interviewer_turn(&req.text).await {
        Ok(media_ref) => (
            StatusCode::OK,
            Json(InterviewerTurnResponse {
                media_ref,
                media_url: media_ref.url(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Interviewer turn failed: {}", e);
            turn_error_response(e)
        }
    }
}

/// GET /session/video/latest
/// Most recent interviewer entry carrying a video reference
pub async fn latest_video(State(state): State<AppState>) -> Response {
    match state.session.latest_video().await {
        Some(media_ref) => (
            StatusCode::OK,
            Json(LatestVideoResponse {
                media_ref,
                media_url: media_ref.url(),
            }),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No video has been generated yet".to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /media/:id
/// Serve stored media bytes without further network calls or credentials
pub async fn get_media(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.media.get(id).await {
        Some(media) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, media.mime_type.clone())],
            media.bytes.clone(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Media {} not found", id),
            }),
        )
            .into_response(),
    }
}

// ============================================================================
// Credential handlers
// ============================================================================

/// GET /credentials
pub async fn get_credentials(State(state): State<AppState>) -> Json<CredentialResponse> {
    Json(CredentialResponse {
        ready: state.credentials.is_ready().await,
    })
}

/// POST /credentials/select
/// User completed key selection; assumed usable without re-verification
pub async fn select_credential(
    State(state): State<AppState>,
    Json(req): Json<SelectCredentialRequest>,
) -> Response {
    if req.api_key.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "API key must not be empty".to_string(),
            }),
        )
            .into_response();
    }

    state.credentials.select(req.api_key).await;
    (StatusCode::OK, Json(CredentialResponse { ready: true })).into_response()
}

// ============================================================================
// Camera and speech frontend handlers
// ============================================================================

/// POST /camera/frame
/// Camera frontend pushes its current webcam still
pub async fn post_camera_frame(
    State(state): State<AppState>,
    Json(req): Json<CameraFrameRequest>,
) -> Response {
    let data = match base64::engine::general_purpose::STANDARD.decode(&req.data) {
        Ok(data) => data,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid frame encoding: {}", e),
                }),
            )
                .into_response();
        }
    };

    let frame = EncodedFrame {
        data,
        mime_type: req.mime_type.unwrap_or_else(|| "image/jpeg".to_string()),
    };
    state.frames.attach_frame(frame).await;

    StatusCode::NO_CONTENT.into_response()
}

/// POST /speech/start
pub async fn speech_start(State(state): State<AppState>) -> Response {
    match state.speech.start().await {
        Ok(()) => {
            info!("Speech capture started via API");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to start speech capture: {}", e),
            }),
        )
            .into_response(),
    }
}

/// POST /speech/stop
pub async fn speech_stop(State(state): State<AppState>) -> Response {
    match state.speech.stop().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to stop speech capture: {}", e),
            }),
        )
            .into_response(),
    }
}

/// POST /speech/events
/// Recognizer frontend forwards its callbacks; events arriving while capture
/// is idle are dropped
pub async fn speech_events(
    State(state): State<AppState>,
    Json(req): Json<SpeechEventRequest>,
) -> Json<SpeechEventAck> {
    let event = match req {
        SpeechEventRequest::Results { segments } => SpeechEvent::Results(segments),
        SpeechEventRequest::Ended => SpeechEvent::Ended,
        SpeechEventRequest::Error { message } => SpeechEvent::Error(message),
    };

    let accepted = state.speech_events.push(event).await;
    Json(SpeechEventAck { accepted })
}

/// GET /speech/transcript
pub async fn get_transcript(State(state): State<AppState>) -> Json<TranscriptResponse> {
    Json(TranscriptResponse {
        listening: state.speech.is_listening(),
        locale: state.speech.locale().to_string(),
        transcript: state.speech.transcript(),
    })
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
