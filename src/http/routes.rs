use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Conversation
        .route("/session/log", get(handlers::get_log))
        .route("/session/state", get(handlers::get_session_state))
        .route("/session/turns/candidate", post(handlers::candidate_turn))
        .route(
            "/session/turns/interviewer",
            post(handlers::interviewer_turn),
        )
        .route("/session/video/latest", get(handlers::latest_video))
        // Generated media
        .route("/media/:id", get(handlers::get_media))
        // Credential gate
        .route("/credentials", get(handlers::get_credentials))
        .route("/credentials/select", post(handlers::select_credential))
        // Capture frontend
        .route("/camera/frame", post(handlers::post_camera_frame))
        .route("/speech/start", post(handlers::speech_start))
        .route("/speech/stop", post(handlers::speech_stop))
        .route("/speech/events", post(handlers::speech_events))
        .route("/speech/transcript", get(handlers::get_transcript))
        // The browser shell runs from a different origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
