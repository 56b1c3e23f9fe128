//! Cross-service event definitions.

use serde::{Deserialize, Serialize};

/// Signal emitted after a session is persisted. Transient: it exists
/// only in transit and is never stored.
///
/// Wire shape: `{"userId": "...", "minutes": 15, "advanceStreak": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecorded {
    pub user_id: String,
    pub minutes: i64,
    /// True when this was the first qualifying session of the user's
    /// local day.
    pub advance_streak: bool,
}

impl SessionRecorded {
    /// Partition key. Per-user delivery order depends on every
    /// producer using it.
    pub fn partition_key(&self) -> &str {
        &self.user_id
    }
}
