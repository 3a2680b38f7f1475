use crate::config::RoomsConfig;
use crate::directory::UserDirectory;
use crate::session::RoomSession;
use crate::token::RoomTokenProvider;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Active room sessions (room_id → session)
    pub sessions: Arc<RwLock<HashMap<String, Arc<RoomSession>>>>,

    /// Token service used to create rooms and join calls
    pub token_provider: Arc<dyn RoomTokenProvider>,

    /// User lookup for session labels
    pub directory: Arc<dyn UserDirectory>,

    /// Room defaults (countdown, connect timeout)
    pub rooms: RoomsConfig,
}

impl AppState {
    pub fn new(
        token_provider: Arc<dyn RoomTokenProvider>,
        directory: Arc<dyn UserDirectory>,
        rooms: RoomsConfig,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            token_provider,
            directory,
            rooms,
        }
    }
}
