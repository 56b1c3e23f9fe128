//! Unified error types for the focus pipeline.
//!
//! Propagation policy: store and validation failures are returned to
//! the caller synchronously; channel and cache failures are absorbed
//! at the service boundary and downgraded to best-effort behavior.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the focus pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Unparseable IANA timezone identifier.
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Out-of-range goal creation parameters. Never retried.
    #[error("goal validation failed: {0}")]
    GoalValidation(String),

    /// Unknown user or goal on direct lookup.
    #[error("not found: {0}")]
    NotFound(String),

    /// Durable store failure.
    #[error("store error: {0}")]
    Store(String),

    /// Event channel publish or fetch failure. Logged by callers,
    /// never allowed to fail the originating durable write.
    #[error("channel error: {0}")]
    Channel(String),

    /// Cache backend failure. Callers treat this as a miss.
    #[error("cache unavailable: {0}")]
    Cache(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn invalid_timezone(id: impl Into<String>) -> Self {
        Self::InvalidTimezone(id.into())
    }

    pub fn goal_validation(msg: impl Into<String>) -> Self {
        Self::GoalValidation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True for failures a caller may synchronously surface; channel
    /// and cache failures are handled in-line instead.
    pub fn is_surfaced(&self) -> bool {
        !matches!(self, Self::Channel(_) | Self::Cache(_))
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::GoalValidation(errors.to_string())
    }
}
