//! Cache key scheme: `<namespace>::<userId>`.

/// Key for a user's "minutes focused today" aggregate.
pub fn duration_key(user_id: &str) -> String {
    format!("duration::{user_id}")
}

/// Key for a user's current streak value.
pub fn streak_key(user_id: &str) -> String {
    format!("streak::{user_id}")
}
