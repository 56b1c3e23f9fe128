//! Per-user consecutive-day streak state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Streak state owned exclusively by the streak tracker. Created
/// lazily on a user's first streak access or advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub user_id: String,
    /// Consecutive local days with at least one day-advancing session.
    pub current: u32,
    /// Instant of the last advance; `None` until the first one.
    pub last_advanced_at: Option<DateTime<Utc>>,
}

impl StreakState {
    /// Fresh zero-state for a user.
    pub fn zero(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            current: 0,
            last_advanced_at: None,
        }
    }

    /// Increments the streak by exactly one.
    pub fn advance(&mut self, now: DateTime<Utc>) {
        self.current += 1;
        self.last_advanced_at = Some(now);
    }

    /// True when the last advance happened before `cutoff`. A streak
    /// that has never advanced is not stale.
    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_advanced_at.is_some_and(|at| at < cutoff)
    }

    /// Staleness reset. Keeps `last_advanced_at` so a later advance
    /// starts a fresh streak from an accurate history.
    pub fn reset(&mut self) {
        self.current = 0;
    }
}
