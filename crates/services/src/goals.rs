//! Goal progress aggregator: consumes session and streak-advance
//! signals and drives each goal's Active → Completed transition.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use focus_core::{Error, Goal, GoalDraft, Result, SessionRecorded};
use focus_store::GoalStore;

use crate::worker::SessionEventHandler;

pub struct GoalAggregator {
    goals: Arc<dyn GoalStore>,
}

impl GoalAggregator {
    pub fn new(goals: Arc<dyn GoalStore>) -> Self {
        Self { goals }
    }

    /// Validates the draft and creates an active, untracked goal.
    pub async fn create_goal(&self, user_id: &str, draft: GoalDraft) -> Result<Goal> {
        let goal = draft.into_goal(user_id)?;
        self.goals.insert(goal.clone()).await?;
        debug!(user = user_id, goal = %goal.id, "goal created");
        Ok(goal)
    }

    /// Applies a session event: the minutes fan out to every active
    /// session-accumulation goal the user owns, and a set first-session
    /// flag additionally advances day-streak goals.
    pub async fn on_session_recorded(&self, event: &SessionRecorded) -> Result<()> {
        self.apply_minutes(&event.user_id, event.minutes).await?;
        if event.advance_streak {
            self.on_streak_advanced(&event.user_id).await?;
        }
        Ok(())
    }

    /// One streak day observed for the user; advances every active
    /// day-streak goal.
    pub async fn on_streak_advanced(&self, user_id: &str) -> Result<()> {
        for mut goal in self.goals.active_for_user(user_id).await? {
            if goal.record_day() {
                if goal.completed {
                    info!(user = user_id, goal = %goal.id, "day-streak goal completed");
                }
                self.goals.update(goal).await?;
            }
        }
        Ok(())
    }

    async fn apply_minutes(&self, user_id: &str, minutes: i64) -> Result<()> {
        for mut goal in self.goals.active_for_user(user_id).await? {
            if goal.record_minutes(minutes) {
                if goal.completed {
                    info!(user = user_id, goal = %goal.id, "session goal completed");
                }
                self.goals.update(goal).await?;
            }
        }
        Ok(())
    }

    /// Marks `goal_id` as its owner's tracked goal, untracking any
    /// currently tracked one first. Two separate writes, not a
    /// transaction: a failure between them leaves no tracked goal,
    /// never two.
    pub async fn track_goal(&self, goal_id: Uuid) -> Result<Goal> {
        let Some(mut goal) = self.goals.get(goal_id).await? else {
            return Err(Error::not_found(format!("goal {goal_id}")));
        };

        if let Some(mut tracked) = self.goals.tracked_for_user(&goal.user_id).await? {
            if tracked.id != goal.id {
                tracked.tracked = false;
                self.goals.update(tracked).await?;
            }
        }

        goal.tracked = true;
        self.goals.update(goal.clone()).await?;
        Ok(goal)
    }

    /// The goal the user is currently tracking, if any.
    pub async fn tracking_goal(&self, user_id: &str) -> Result<Option<Goal>> {
        self.goals.tracked_for_user(user_id).await
    }

    pub async fn delete_goal(&self, goal_id: Uuid) -> Result<()> {
        if !self.goals.delete(goal_id).await? {
            return Err(Error::not_found(format!("goal {goal_id}")));
        }
        Ok(())
    }

    pub async fn list_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        self.goals.list_for_user(user_id).await
    }
}

#[async_trait]
impl SessionEventHandler for GoalAggregator {
    fn name(&self) -> &'static str {
        "goal-aggregator"
    }

    async fn handle(&self, event: &SessionRecorded) -> Result<()> {
        self.on_session_recorded(event).await
    }
}
