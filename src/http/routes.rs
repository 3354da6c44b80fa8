use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session
        .route("/session/status", get(handlers::get_status))
        .route("/session/mode", post(handlers::select_mode))
        .route("/session/reset", post(handlers::reset_session))
        // Capture
        .route("/capture/start", post(handlers::start_capture))
        .route("/capture/toggle", post(handlers::toggle_camera))
        // Recording
        .route("/record/start", post(handlers::start_recording))
        .route("/record/stop", post(handlers::stop_recording))
        .route("/snapshot", post(handlers::take_snapshot))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
