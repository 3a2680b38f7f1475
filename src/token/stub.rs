use anyhow::Result;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

use super::provider::{RoomToken, RoomTokenProvider};

/// Stand-in token service with configurable simulated latency.
///
/// Mints deterministic-looking room URLs and random tokens the way a hosted
/// provider would, without any network traffic.
pub struct StubTokenProvider {
    /// Base URL rooms are created under (e.g., "https://rooms.example.daily.co")
    base_url: String,

    /// Simulated round-trip latency per call
    latency: Duration,
}

impl StubTokenProvider {
    pub fn new(base_url: String, latency: Duration) -> Self {
        Self { base_url, latency }
    }
}

#[async_trait::async_trait]
impl RoomTokenProvider for StubTokenProvider {
    async fn create_room(&self, room_id: &str) -> Result<String> {
        sleep(self.latency).await;

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), room_id);
        info!("Created room {}", url);

        Ok(url)
    }

    async fn acquire_token(&self, room_id: &str, display_name: &str) -> Result<RoomToken> {
        sleep(self.latency).await;

        info!("Minted token for {} in room {}", display_name, room_id);

        Ok(RoomToken::new(format!(
            "stub-{}-{}",
            room_id,
            uuid::Uuid::new_v4()
        )))
    }

    fn name(&self) -> &str {
        "stub"
    }
}
