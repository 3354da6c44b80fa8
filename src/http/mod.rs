//! HTTP control API
//!
//! The buttons of the capture page, as endpoints:
//! - POST /session/mode - Select video or audio
//! - POST /capture/start - Acquire the live stream
//! - POST /capture/toggle - Switch front/back camera
//! - POST /record/start - Start recording
//! - POST /record/stop - Stop, upload and reset
//! - POST /snapshot - Capture and upload a still image
//! - POST /session/reset - Drop all in-memory state
//! - GET /session/status - Query session state
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
