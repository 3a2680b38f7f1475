use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one room session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Room identifier (e.g., "interview-2026-08-05-frontend")
    pub room_id: String,

    /// Join URL for the room, from the token service
    pub room_url: String,

    /// Participant label, resolved through the user directory before joining
    pub display_name: String,

    /// How long token acquisition may take before the join fails
    pub connect_timeout: Duration,

    /// Seconds put on the countdown clock when the room opens
    /// Default: 2700 (45 minutes)
    pub countdown_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let room_id = format!("room-{}", uuid::Uuid::new_v4());
        Self {
            room_url: format!("https://rooms.example.com/{}", room_id),
            room_id,
            display_name: "Guest".to_string(),
            connect_timeout: Duration::from_secs(10),
            countdown_secs: 2700, // 45 minutes
        }
    }
}
