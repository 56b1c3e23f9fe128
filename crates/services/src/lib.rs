//! The three data owners of the focus pipeline and the background
//! workers that drive them:
//! - Session recorder (durable session log + daily aggregate)
//! - Streak tracker (first-session signals → streak counter)
//! - Goal aggregator (session/streak signals → goal progress)
//! - Event workers and retention on the scheduler

pub mod goals;
pub mod recorder;
pub mod retention;
pub mod scheduler;
pub mod streak;
pub mod worker;

pub use goals::GoalAggregator;
pub use recorder::SessionRecorder;
pub use retention::RetentionWorker;
pub use scheduler::{WorkerConfig, WorkerScheduler};
pub use streak::StreakTracker;
pub use worker::{EventWorker, EventWorkerConfig, SessionEventHandler};
