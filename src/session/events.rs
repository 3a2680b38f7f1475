use serde::Serialize;

use super::session::CallPhase;

/// State-change notifications published to the presentation layer.
///
/// Delivered over a `tokio::sync::broadcast` channel so any number of
/// renderers can follow one session; a subscriber that falls behind misses
/// old events rather than blocking transitions.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The call moved to a new lifecycle phase
    PhaseChanged { phase: CallPhase },

    /// An audio/video flag flipped while connected
    MediaChanged {
        video_enabled: bool,
        audio_enabled: bool,
    },

    /// The countdown clock started running
    TimerStarted { remaining_secs: u64 },

    /// The countdown clock was paused
    TimerPaused { remaining_secs: u64 },

    /// The countdown clock was reset
    TimerReset { remaining_secs: u64 },

    /// One second elapsed on a running clock
    TimerTick { remaining_secs: u64 },

    /// The clock reached zero. Emitted exactly once per countdown.
    TimerExpired,
}
