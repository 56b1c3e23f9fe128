//! Persistence collaborators for the focus pipeline.
//!
//! Single-entity writes only; no multi-entity transactions are assumed
//! anywhere. Each service owns exactly one of these stores.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use focus_core::{Goal, Result, Session, StreakState};

/// Durable session log, owned by the session recorder.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: Session) -> Result<()>;

    /// Sessions for `user_id` with `completed_at` in `[from, to)`.
    async fn sessions_in_window(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Session>>;

    /// Removes sessions completed before `cutoff`. Returns the number
    /// removed.
    async fn delete_completed_before(&self, cutoff: DateTime<Utc>) -> Result<usize>;
}

/// Streak state storage, owned by the streak tracker.
#[async_trait]
pub trait StreakStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<StreakState>>;

    /// Upserts the state for `state.user_id`.
    async fn put(&self, state: StreakState) -> Result<()>;
}

/// Goal storage, owned by the goal aggregator.
#[async_trait]
pub trait GoalStore: Send + Sync {
    async fn insert(&self, goal: Goal) -> Result<()>;

    async fn get(&self, goal_id: Uuid) -> Result<Option<Goal>>;

    /// Replaces the stored goal with the same id.
    async fn update(&self, goal: Goal) -> Result<()>;

    /// Returns false when no goal with that id existed.
    async fn delete(&self, goal_id: Uuid) -> Result<bool>;

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Goal>>;

    /// Goals for the user that have not completed.
    async fn active_for_user(&self, user_id: &str) -> Result<Vec<Goal>>;

    /// The user's tracked goal, if any. At most one exists.
    async fn tracked_for_user(&self, user_id: &str) -> Result<Option<Goal>>;
}
