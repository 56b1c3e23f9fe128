//! Topic names shared by producers and consumers.

/// Session fan-out topic. Partitioned by user id; consumed
/// independently by the streak tracker and the goal aggregator.
pub const SESSION_EVENTS: &str = "session-events";
