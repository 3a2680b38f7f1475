use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role a user plays in the hiring flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Candidate,
    Interviewer,
    Admin,
}

/// A directory record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Directory identifier
    pub id: String,

    /// Display name shown in the room
    pub name: String,

    pub email: String,

    pub role: UserRole,

    /// Profile picture, if the user has one
    pub avatar_url: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}
