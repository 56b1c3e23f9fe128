//! Streak tracker integration tests.

use chrono::{Duration, Utc};

use aggregate_cache::{keys, AggregateCache};
use focus_core::SessionRecorded;
use focus_services::SessionEventHandler;
use focus_store::StreakStore;

use integration_tests::fixtures::{pipeline, seed_streak};

fn event(user_id: &str, advance_streak: bool) -> SessionRecorded {
    SessionRecorded {
        user_id: user_id.to_string(),
        minutes: 25,
        advance_streak,
    }
}

#[tokio::test]
async fn advance_increments_by_exactly_one() {
    let p = pipeline();

    assert_eq!(p.streaks.advance("u1").await.unwrap(), 1);
    assert_eq!(p.streaks.advance("u1").await.unwrap(), 2);
    assert_eq!(p.streaks.current_streak("u1", "UTC").await.unwrap(), 2);
}

#[tokio::test]
async fn handler_advances_only_on_first_session_events() {
    let p = pipeline();

    p.streaks.handle(&event("u1", false)).await.unwrap();
    assert!(StreakStore::get(p.store.as_ref(), "u1")
        .await
        .unwrap()
        .is_none());
    assert_eq!(p.streaks.current_streak("u1", "UTC").await.unwrap(), 0);

    p.streaks.handle(&event("u1", true)).await.unwrap();
    assert_eq!(p.streaks.current_streak("u1", "UTC").await.unwrap(), 1);
}

#[tokio::test]
async fn unknown_user_has_a_zero_streak() {
    let p = pipeline();
    assert_eq!(
        p.streaks.current_streak("ghost", "Europe/Sofia").await.unwrap(),
        0
    );
}

#[tokio::test]
async fn stale_streak_resets_lazily_and_persists() {
    let p = pipeline();
    seed_streak(&p.store, "u1", 5, Utc::now() - Duration::days(3)).await;

    assert_eq!(
        p.streaks.current_streak("u1", "Europe/Sofia").await.unwrap(),
        0
    );

    let state = StreakStore::get(p.store.as_ref(), "u1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state.current, 0);
    assert!(state.last_advanced_at.is_some());
}

#[tokio::test]
async fn one_missed_day_is_within_grace() {
    let p = pipeline();
    seed_streak(&p.store, "u1", 7, Utc::now() - Duration::hours(36)).await;

    assert_eq!(
        p.streaks.current_streak("u1", "Europe/Sofia").await.unwrap(),
        7
    );
    let state = StreakStore::get(p.store.as_ref(), "u1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state.current, 7);
}

#[tokio::test]
async fn reads_are_cached_until_invalidated() {
    let p = pipeline();

    p.streaks.advance("u1").await.unwrap();
    assert_eq!(p.streaks.current_streak("u1", "UTC").await.unwrap(), 1);

    // Rewrite the store behind the cache's back.
    seed_streak(&p.store, "u1", 99, Utc::now()).await;
    assert_eq!(p.streaks.current_streak("u1", "UTC").await.unwrap(), 1);

    p.cache.invalidate(&keys::streak_key("u1")).await;
    assert_eq!(p.streaks.current_streak("u1", "UTC").await.unwrap(), 99);
}
