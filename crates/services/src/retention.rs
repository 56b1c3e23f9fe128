//! Session retention worker.
//!
//! Sessions only feed local-day window queries. Once no timezone on
//! Earth can still reach a session through today's window it is dead
//! weight, so a background job prunes it from the log.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use focus_core::Result;
use focus_store::SessionStore;

/// How long sessions are kept. Two days covers every UTC offset plus
/// the full grace window of any local day still in flight.
const RETENTION_DAYS: i64 = 2;

pub struct RetentionWorker {
    sessions: Arc<dyn SessionStore>,
    max_age: Duration,
}

impl RetentionWorker {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            sessions,
            max_age: Duration::days(RETENTION_DAYS),
        }
    }

    pub fn with_max_age(sessions: Arc<dyn SessionStore>, max_age: Duration) -> Self {
        Self { sessions, max_age }
    }

    /// Runs one pruning pass.
    pub async fn run(&self) -> Result<()> {
        let cutoff = Utc::now() - self.max_age;
        let removed = self.sessions.delete_completed_before(cutoff).await?;

        if removed > 0 {
            info!(removed, %cutoff, "pruned old sessions");
        }

        Ok(())
    }
}
