use serde::{Deserialize, Serialize};

use super::session::CallPhase;

/// Point-in-time view of a session for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Room this session belongs to
    pub room_id: String,

    /// Join URL for the room
    pub room_url: String,

    /// Participant label shown in the room
    pub display_name: String,

    /// Current call lifecycle phase
    pub phase: CallPhase,

    /// Whether the camera is on (meaningful while connected)
    pub video_enabled: bool,

    /// Whether the microphone is on (meaningful while connected)
    pub audio_enabled: bool,

    /// Seconds since the call connected, while in-call
    pub connected_secs: Option<f64>,

    /// Countdown clock state
    pub timer: TimerSnapshot,
}

/// Countdown clock portion of a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub running: bool,
    pub remaining_secs: u64,
}
