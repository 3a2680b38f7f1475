//! Room session management
//!
//! This module provides the `RoomSession` abstraction that manages:
//! - The call lifecycle (idle → connecting → connected / failed)
//! - Token acquisition through the external token service, with cancellation
//! - Audio/video toggle flags while connected
//! - The countdown clock and its one-second tick task
//! - State-change events and snapshots for the presentation layer

mod config;
mod events;
mod session;
mod snapshot;
mod timer;

pub use config::SessionConfig;
pub use events::SessionEvent;
pub use session::{CallPhase, RoomSession};
pub use snapshot::{SessionSnapshot, TimerSnapshot};
pub use timer::{CountdownTimer, TickOutcome};
