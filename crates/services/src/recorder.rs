//! Session recorder: persists completed sessions, maintains the cached
//! daily aggregate, and announces first-session-of-day signals.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error};

use aggregate_cache::{keys, AggregateCache};
use event_channel::{topics, EventPublisher};
use focus_core::{LocalDayWindow, Result, Session, SessionRecorded};
use focus_store::SessionStore;

pub struct SessionRecorder {
    sessions: Arc<dyn SessionStore>,
    publisher: Arc<dyn EventPublisher>,
    cache: Arc<dyn AggregateCache>,
}

impl SessionRecorder {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        publisher: Arc<dyn EventPublisher>,
        cache: Arc<dyn AggregateCache>,
    ) -> Self {
        Self {
            sessions,
            publisher,
            cache,
        }
    }

    /// Records a completed focus session and fans out the signal.
    ///
    /// The durable write is the source of truth: a publish failure is
    /// logged and the session stays recorded. Two concurrent calls for
    /// the same user can both observe an otherwise-empty window and
    /// both publish `advance_streak = true`; there is deliberately no
    /// lock here.
    pub async fn record_session(
        &self,
        user_id: &str,
        minutes: i64,
        timezone: &str,
    ) -> Result<Session> {
        let now = Utc::now();
        let window = LocalDayWindow::compute(timezone, now)?;

        let session = Session::new(user_id, minutes, now);
        self.sessions.insert(session.clone()).await?;

        // Re-query the window rather than trust local state; other
        // writers may have landed sessions in the meantime.
        let in_window = self
            .sessions
            .sessions_in_window(user_id, window.start(), window.end())
            .await?;
        let first_of_day = in_window.len() == 1;

        // Invalidate, never update in place: racing writers updating a
        // cached total could strand a stale value until midnight.
        self.cache.invalidate(&keys::duration_key(user_id)).await;

        let event = SessionRecorded {
            user_id: user_id.to_string(),
            minutes,
            advance_streak: first_of_day,
        };
        if let Err(e) = self.publisher.publish(topics::SESSION_EVENTS, &event).await {
            error!(user = user_id, error = %e, "failed to publish session event");
        }

        debug!(
            user = user_id,
            minutes, first_of_day, "session recorded"
        );
        Ok(session)
    }

    /// Total focused minutes in the user's current local day.
    ///
    /// Cache-aside: a hit answers without touching the store; a miss
    /// recomputes from the session log and caches the total until the
    /// user's next local midnight.
    pub async fn todays_duration(&self, user_id: &str, timezone: &str) -> Result<i64> {
        let key = keys::duration_key(user_id);
        if let Some(total) = self.cache.get(&key).await {
            debug!(user = user_id, total, "duration cache hit");
            return Ok(total);
        }

        let now = Utc::now();
        let window = LocalDayWindow::compute(timezone, now)?;

        let total = self
            .sessions
            .sessions_in_window(user_id, window.start(), window.end())
            .await?
            .iter()
            .map(|s| s.minutes)
            .sum();

        self.cache
            .put(&key, total, window.until_next_midnight(now))
            .await;
        Ok(total)
    }
}
