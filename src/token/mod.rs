//! Room-token service seam
//!
//! The session core never talks to a video transport directly; it asks a
//! `RoomTokenProvider` for an opaque `RoomToken` scoped to one
//! (room, participant) pair. The stub provider stands in for a hosted
//! token service during development and tests.

mod provider;
mod stub;

pub use provider::{RoomToken, RoomTokenProvider};
pub use stub::StubTokenProvider;
