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
        // Call lifecycle
        .route("/rooms/:room_id/join", post(handlers::join_room))
        .route("/rooms/:room_id/leave", post(handlers::leave_room))
        // Media toggles
        .route("/rooms/:room_id/media/video", post(handlers::toggle_video))
        .route("/rooms/:room_id/media/audio", post(handlers::toggle_audio))
        // Countdown clock
        .route("/rooms/:room_id/timer/start", post(handlers::start_timer))
        .route("/rooms/:room_id/timer/pause", post(handlers::pause_timer))
        .route("/rooms/:room_id/timer/reset", post(handlers::reset_timer))
        // Session queries
        .route("/rooms/:room_id/status", get(handlers::room_status))
        // The dashboard calls this API from the browser
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
