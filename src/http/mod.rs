//! HTTP API server for the scheduling dashboard
//!
//! This module provides a REST API for controlling room sessions:
//! - POST /rooms/:id/join - Join a room (creates the session on first join)
//! - POST /rooms/:id/leave - Leave and tear the session down
//! - POST /rooms/:id/media/video, /rooms/:id/media/audio - Media toggles
//! - POST /rooms/:id/timer/start, /pause, /reset - Countdown control
//! - GET /rooms/:id/status - Session snapshot
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
