//! Streak tracker: consumes first-session signals and answers streak
//! queries with lazy staleness resets.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use aggregate_cache::{keys, AggregateCache};
use focus_core::{LocalDayWindow, Result, SessionRecorded, StreakState};
use focus_store::StreakStore;

use crate::worker::SessionEventHandler;

pub struct StreakTracker {
    streaks: Arc<dyn StreakStore>,
    cache: Arc<dyn AggregateCache>,
}

impl StreakTracker {
    pub fn new(streaks: Arc<dyn StreakStore>, cache: Arc<dyn AggregateCache>) -> Self {
        Self { streaks, cache }
    }

    /// Advances the streak by exactly one day and invalidates the
    /// cached value. State is created on first advance.
    pub async fn advance(&self, user_id: &str) -> Result<u32> {
        let mut state = self
            .streaks
            .get(user_id)
            .await?
            .unwrap_or_else(|| StreakState::zero(user_id));

        state.advance(Utc::now());
        let current = state.current;
        self.streaks.put(state).await?;

        self.cache.invalidate(&keys::streak_key(user_id)).await;

        debug!(user = user_id, streak = current, "streak advanced");
        Ok(current)
    }

    /// The user's current streak, cache-aside.
    ///
    /// On a miss the stored state is checked for staleness: a last
    /// advance before `start of today − 2 local days` resets the
    /// streak to zero, and the reset is persisted before answering.
    /// That grants exactly one missed calendar day of grace. A user
    /// with no state yet simply has a streak of zero.
    pub async fn current_streak(&self, user_id: &str, timezone: &str) -> Result<u32> {
        let key = keys::streak_key(user_id);
        if let Some(cached) = self.cache.get(&key).await {
            debug!(user = user_id, streak = cached, "streak cache hit");
            return Ok(cached as u32);
        }

        let now = Utc::now();
        let window = LocalDayWindow::compute(timezone, now)?;

        let current = match self.streaks.get(user_id).await? {
            None => 0,
            Some(mut state) => {
                if state.is_stale(window.grace_cutoff()) {
                    state.reset();
                    let current = state.current;
                    self.streaks.put(state).await?;
                    debug!(user = user_id, "stale streak reset");
                    current
                } else {
                    state.current
                }
            }
        };

        self.cache
            .put(&key, i64::from(current), window.until_next_midnight(now))
            .await;
        Ok(current)
    }
}

#[async_trait]
impl SessionEventHandler for StreakTracker {
    fn name(&self) -> &'static str {
        "streak-tracker"
    }

    async fn handle(&self, event: &SessionRecorded) -> Result<()> {
        if event.advance_streak {
            self.advance(&event.user_id).await?;
        }
        Ok(())
    }
}
