use anyhow::{Context, Result};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

use super::user::{User, UserRole};

/// User lookup seam. The session core only needs this to label a session
/// with a display name before joining.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up a user by id. Fails when the id is unknown.
    async fn resolve_user(&self, user_id: &str) -> Result<User>;
}

/// Directory backed by an in-memory user table, with simulated lookup
/// latency so callers are exercised against a realistically async seam.
pub struct InMemoryDirectory {
    users: HashMap<String, User>,
    latency: Duration,
}

impl InMemoryDirectory {
    pub fn new(users: Vec<User>, latency: Duration) -> Self {
        info!("Directory loaded with {} users", users.len());

        Self {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            latency,
        }
    }

    /// Directory pre-seeded with the demo user set.
    pub fn with_demo_users(latency: Duration) -> Self {
        let now = chrono::Utc::now();

        let users = vec![
            User {
                id: "1".to_string(),
                name: "John Interviewer".to_string(),
                email: "interviewer@example.com".to_string(),
                role: UserRole::Interviewer,
                avatar_url: Some(
                    "https://images.pexels.com/photos/220453/pexels-photo-220453.jpeg".to_string(),
                ),
                created_at: now,
            },
            User {
                id: "2".to_string(),
                name: "Jane Candidate".to_string(),
                email: "candidate@example.com".to_string(),
                role: UserRole::Candidate,
                avatar_url: Some(
                    "https://images.pexels.com/photos/774909/pexels-photo-774909.jpeg".to_string(),
                ),
                created_at: now,
            },
            User {
                id: "3".to_string(),
                name: "Michael Tech".to_string(),
                email: "michael@example.com".to_string(),
                role: UserRole::Interviewer,
                avatar_url: Some(
                    "https://images.pexels.com/photos/614810/pexels-photo-614810.jpeg".to_string(),
                ),
                created_at: now,
            },
        ];

        Self::new(users, latency)
    }
}

#[async_trait::async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn resolve_user(&self, user_id: &str) -> Result<User> {
        sleep(self.latency).await;

        self.users
            .get(user_id)
            .cloned()
            .with_context(|| format!("user {} not found in directory", user_id))
    }
}
