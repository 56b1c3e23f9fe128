//! Focus session records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed focus session. Immutable once recorded; the durable
/// session log is the source of truth for every daily aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: String,
    /// Minutes of focused time in this session.
    pub minutes: i64,
    /// Completion instant, always UTC.
    pub completed_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new session with a generated id.
    pub fn new(user_id: impl Into<String>, minutes: i64, completed_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            minutes,
            completed_at,
        }
    }
}
