//! In-memory store backing all three persistence collaborators.
//!
//! Explicitly constructed and injected; its lifecycle is the lifecycle
//! of whoever owns the `Arc`. Locks are per-collection, so session,
//! streak, and goal operations never contend with each other.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use focus_core::{Error, Goal, Result, Session, StreakState};

use crate::{GoalStore, SessionStore, StreakStore};

/// Shared in-memory store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    sessions: Arc<Mutex<Vec<Session>>>,
    streaks: Arc<Mutex<HashMap<String, StreakState>>>,
    goals: Arc<Mutex<HashMap<Uuid, Goal>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions. Test and diagnostics helper.
    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert(&self, session: Session) -> Result<()> {
        self.sessions.lock().push(session);
        Ok(())
    }

    async fn sessions_in_window(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Session>> {
        Ok(self
            .sessions
            .lock()
            .iter()
            .filter(|s| s.user_id == user_id && s.completed_at >= from && s.completed_at < to)
            .cloned()
            .collect())
    }

    async fn delete_completed_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|s| s.completed_at >= cutoff);
        Ok(before - sessions.len())
    }
}

#[async_trait]
impl StreakStore for MemoryStore {
    async fn get(&self, user_id: &str) -> Result<Option<StreakState>> {
        Ok(self.streaks.lock().get(user_id).cloned())
    }

    async fn put(&self, state: StreakState) -> Result<()> {
        self.streaks.lock().insert(state.user_id.clone(), state);
        Ok(())
    }
}

#[async_trait]
impl GoalStore for MemoryStore {
    async fn insert(&self, goal: Goal) -> Result<()> {
        self.goals.lock().insert(goal.id, goal);
        Ok(())
    }

    async fn get(&self, goal_id: Uuid) -> Result<Option<Goal>> {
        Ok(self.goals.lock().get(&goal_id).cloned())
    }

    async fn update(&self, goal: Goal) -> Result<()> {
        let mut goals = self.goals.lock();
        if !goals.contains_key(&goal.id) {
            return Err(Error::not_found(format!("goal {}", goal.id)));
        }
        goals.insert(goal.id, goal);
        Ok(())
    }

    async fn delete(&self, goal_id: Uuid) -> Result<bool> {
        Ok(self.goals.lock().remove(&goal_id).is_some())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Goal>> {
        Ok(self
            .goals
            .lock()
            .values()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn active_for_user(&self, user_id: &str) -> Result<Vec<Goal>> {
        Ok(self
            .goals
            .lock()
            .values()
            .filter(|g| g.user_id == user_id && g.is_active())
            .cloned()
            .collect())
    }

    async fn tracked_for_user(&self, user_id: &str) -> Result<Option<Goal>> {
        Ok(self
            .goals
            .lock()
            .values()
            .find(|g| g.user_id == user_id && g.tracked)
            .cloned())
    }
}
