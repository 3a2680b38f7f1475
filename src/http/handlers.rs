use super::state::AppState;
use crate::session::{RoomSession, SessionConfig, SessionSnapshot};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct JoinRoomRequest {
    /// Directory id of the participant joining the room
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct JoinRoomResponse {
    pub room_id: String,
    pub status: String,
    pub message: String,
    pub snapshot: SessionSnapshot,
}

#[derive(Debug, Serialize)]
pub struct LeaveRoomResponse {
    pub room_id: String,
    pub status: String,
    pub snapshot: SessionSnapshot,
}

#[derive(Debug, Deserialize, Default)]
pub struct ResetTimerRequest {
    /// Seconds to put back on the clock (default: the configured countdown)
    pub seconds: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /rooms/:room_id/join
/// Join a room, creating the session on first join
pub async fn join_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(req): Json<JoinRoomRequest>,
) -> impl IntoResponse {
    info!("Join requested for room {} by user {}", room_id, req.user_id);

    // Label the session before joining
    let user = match state.directory.resolve_user(&req.user_id).await {
        Ok(user) => user,
        Err(e) => {
            error!("Failed to resolve user {}: {:#}", req.user_id, e);
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Unknown user: {}", req.user_id),
                }),
            )
                .into_response();
        }
    };

    // Reuse the room's session if it exists, create it otherwise
    let existing = {
        let sessions = state.sessions.read().await;
        sessions.get(&room_id).cloned()
    };

    let session = match existing {
        Some(session) => {
            if session.display_name() != user.name {
                return (
                    StatusCode::CONFLICT,
                    Json(ErrorResponse {
                        error: format!("Room {} already has an active session", room_id),
                    }),
                )
                    .into_response();
            }
            session
        }
        None => {
            let room_url = match state.token_provider.create_room(&room_id).await {
                Ok(url) => url,
                Err(e) => {
                    error!("Failed to create room {}: {:#}", room_id, e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorResponse {
                            error: format!("Failed to create room: {}", e),
                        }),
                    )
                        .into_response();
                }
            };

            let config = SessionConfig {
                room_id: room_id.clone(),
                room_url,
                display_name: user.name.clone(),
                connect_timeout: Duration::from_secs(state.rooms.connect_timeout_secs),
                countdown_secs: state.rooms.default_countdown_secs,
            };

            let session = Arc::new(RoomSession::new(
                config,
                Arc::clone(&state.token_provider),
            ));

            let mut sessions = state.sessions.write().await;
            // A concurrent join may have created the session first
            sessions
                .entry(room_id.clone())
                .or_insert_with(|| Arc::clone(&session))
                .clone()
        }
    };

    session.join().await;
    let snapshot = session.snapshot().await;

    (
        StatusCode::OK,
        Json(JoinRoomResponse {
            room_id: room_id.clone(),
            status: "joining".to_string(),
            message: format!("{} is joining room {}", user.name, room_id),
            snapshot,
        }),
    )
        .into_response()
}

/// POST /rooms/:room_id/leave
/// Leave the call and tear the session down
pub async fn leave_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    info!("Leave requested for room {}", room_id);

    let session = {
        let mut sessions = state.sessions.write().await;
        sessions.remove(&room_id)
    };

    match session {
        Some(session) => {
            session.shutdown().await;
            let snapshot = session.snapshot().await;

            (
                StatusCode::OK,
                Json(LeaveRoomResponse {
                    room_id,
                    status: "left".to_string(),
                    snapshot,
                }),
            )
                .into_response()
        }
        None => room_not_found(&room_id),
    }
}

/// POST /rooms/:room_id/media/video
/// Toggle the camera (no-op unless connected)
pub async fn toggle_video(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    with_session(&state, &room_id, |session| async move {
        session.toggle_video().await;
        session.snapshot().await
    })
    .await
}

/// POST /rooms/:room_id/media/audio
/// Toggle the microphone (no-op unless connected)
pub async fn toggle_audio(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    with_session(&state, &room_id, |session| async move {
        session.toggle_audio().await;
        session.snapshot().await
    })
    .await
}

/// POST /rooms/:room_id/timer/start
pub async fn start_timer(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    with_session(&state, &room_id, |session| async move {
        session.start_timer().await;
        session.snapshot().await
    })
    .await
}

/// POST /rooms/:room_id/timer/pause
pub async fn pause_timer(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    with_session(&state, &room_id, |session| async move {
        session.pause_timer().await;
        session.snapshot().await
    })
    .await
}

/// POST /rooms/:room_id/timer/reset
pub async fn reset_timer(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    body: Option<Json<ResetTimerRequest>>,
) -> impl IntoResponse {
    let seconds = body
        .and_then(|Json(req)| req.seconds)
        .unwrap_or(state.rooms.default_countdown_secs);

    with_session(&state, &room_id, move |session| async move {
        session.reset_timer(seconds).await;
        session.snapshot().await
    })
    .await
}

/// GET /rooms/:room_id/status
/// Current session snapshot
pub async fn room_status(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    with_session(&state, &room_id, |session| async move {
        session.snapshot().await
    })
    .await
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

// ============================================================================
// Helpers
// ============================================================================

/// Run `op` against the room's session, or 404 when the room is unknown.
async fn with_session<F, Fut>(state: &AppState, room_id: &str, op: F) -> axum::response::Response
where
    F: FnOnce(Arc<RoomSession>) -> Fut,
    Fut: std::future::Future<Output = SessionSnapshot>,
{
    let session = {
        let sessions = state.sessions.read().await;
        sessions.get(room_id).cloned()
    };

    match session {
        Some(session) => {
            let snapshot = op(session).await;
            (StatusCode::OK, Json(snapshot)).into_response()
        }
        None => room_not_found(room_id),
    }
}

fn room_not_found(room_id: &str) -> axum::response::Response {
    error!("Room {} not found", room_id);
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Room {} not found", room_id),
        }),
    )
        .into_response()
}
