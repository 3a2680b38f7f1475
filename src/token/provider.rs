use anyhow::Result;
use std::fmt;

/// Capability for joining one room as one participant.
///
/// Opaque to the session core: it is held while connected and handed to the
/// transport layer that redeems it, never inspected.
#[derive(Clone, PartialEq, Eq)]
pub struct RoomToken(String);

impl RoomToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Raw token, for the transport adapter that redeems it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RoomToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keep the capability out of logs
        f.write_str("RoomToken(..)")
    }
}

/// Token service backend trait
///
/// Implementations:
/// - Stub: deterministic tokens with simulated latency (development, tests)
/// - A hosted video provider's REST API, behind a server-side key
#[async_trait::async_trait]
pub trait RoomTokenProvider: Send + Sync {
    /// Create (or look up) the room and return its join URL
    async fn create_room(&self, room_id: &str) -> Result<String>;

    /// Mint a token scoped to one (room, participant) pair. May fail.
    async fn acquire_token(&self, room_id: &str, display_name: &str) -> Result<RoomToken>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
