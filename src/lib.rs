pub mod config;
pub mod directory;
pub mod http;
pub mod session;
pub mod token;

pub use config::Config;
pub use directory::{InMemoryDirectory, User, UserDirectory, UserRole};
pub use http::{create_router, AppState};
pub use session::{
    CallPhase, CountdownTimer, RoomSession, SessionConfig, SessionEvent, SessionSnapshot,
    TickOutcome, TimerSnapshot,
};
pub use token::{RoomToken, RoomTokenProvider, StubTokenProvider};
