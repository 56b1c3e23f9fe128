//! User-defined goals and their Active → Completed state machine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;

/// Goal kind with its target parameters. A new kind is a
/// compile-time-checked extension: every consumer matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoalKind {
    /// Accumulate `sets * minutes_per_set` focused minutes.
    SessionAccumulation { sets: u32, minutes_per_set: u32 },
    /// Advance the day streak `total_days` times.
    DayStreak { total_days: u32 },
}

impl GoalKind {
    /// The progress value at which the goal completes.
    pub fn target(&self) -> i64 {
        match self {
            Self::SessionAccumulation {
                sets,
                minutes_per_set,
            } => i64::from(*sets) * i64::from(*minutes_per_set),
            Self::DayStreak { total_days } => i64::from(*total_days),
        }
    }
}

/// Parameters for a session-accumulation goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct SessionGoalParams {
    #[validate(range(min = 1, max = 10))]
    pub sets: u32,
    #[validate(range(min = 1, max = 60))]
    pub minutes_per_set: u32,
}

/// Parameters for a day-streak goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct StreakGoalParams {
    #[validate(range(min = 1))]
    pub total_days: u32,
}

/// Kind-specific creation parameters, range-checked before a `Goal`
/// ever exists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoalParams {
    SessionAccumulation(SessionGoalParams),
    DayStreak(StreakGoalParams),
}

impl GoalParams {
    /// Validates the parameters and produces the goal kind.
    pub fn into_kind(self) -> Result<GoalKind> {
        match self {
            Self::SessionAccumulation(params) => {
                params.validate()?;
                Ok(GoalKind::SessionAccumulation {
                    sets: params.sets,
                    minutes_per_set: params.minutes_per_set,
                })
            }
            Self::DayStreak(params) => {
                params.validate()?;
                Ok(GoalKind::DayStreak {
                    total_days: params.total_days,
                })
            }
        }
    }
}

/// A goal creation request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GoalDraft {
    #[validate(length(min = 1, max = 60))]
    pub title: String,
    #[validate(length(min = 1, max = 60))]
    pub reward: String,
    pub params: GoalParams,
}

impl GoalDraft {
    /// Validates the draft and initializes an active, untracked goal.
    pub fn into_goal(self, user_id: impl Into<String>) -> Result<Goal> {
        self.validate()?;
        let kind = self.params.into_kind()?;
        Ok(Goal {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            title: self.title,
            reward: self.reward,
            kind,
            progress: 0,
            completed: false,
            tracked: false,
        })
    }
}

/// A user-defined goal. `completed` is terminal: progress never
/// changes once it is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub reward: String,
    pub kind: GoalKind,
    pub progress: i64,
    pub completed: bool,
    pub tracked: bool,
}

impl Goal {
    pub fn is_active(&self) -> bool {
        !self.completed
    }

    /// Applies focused minutes to an active session-accumulation goal.
    /// Returns true when progress changed. Completion requires landing
    /// exactly on the target: an overshooting session leaves the goal
    /// active.
    pub fn record_minutes(&mut self, minutes: i64) -> bool {
        if self.completed || !matches!(self.kind, GoalKind::SessionAccumulation { .. }) {
            return false;
        }
        self.progress += minutes;
        if self.progress == self.kind.target() {
            self.completed = true;
        }
        true
    }

    /// Applies one streak day to an active day-streak goal. Returns
    /// true when progress changed.
    pub fn record_day(&mut self) -> bool {
        if self.completed || !matches!(self.kind, GoalKind::DayStreak { .. }) {
            return false;
        }
        self.progress += 1;
        if self.progress == self.kind.target() {
            self.completed = true;
        }
        true
    }
}
