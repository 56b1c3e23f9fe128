//! Session recorder integration tests.

use std::sync::Arc;

use aggregate_cache::MemoryCache;
use focus_core::Error;
use focus_services::SessionRecorder;
use focus_store::SessionStore;

use integration_tests::fixtures::{pipeline, seed_session};
use integration_tests::mocks::{CountingSessionStore, MockPublisher, UnavailableCache};

#[tokio::test]
async fn recording_persists_and_reports_todays_total() {
    let p = pipeline();

    p.recorder
        .record_session("u1", 15, "Europe/Sofia")
        .await
        .unwrap();
    assert_eq!(
        p.recorder.todays_duration("u1", "Europe/Sofia").await.unwrap(),
        15
    );

    p.recorder
        .record_session("u1", 10, "Europe/Sofia")
        .await
        .unwrap();
    assert_eq!(
        p.recorder.todays_duration("u1", "Europe/Sofia").await.unwrap(),
        25
    );
}

#[tokio::test]
async fn first_session_flag_is_set_exactly_once_per_day() {
    let p = pipeline();

    p.recorder.record_session("u1", 15, "UTC").await.unwrap();
    p.recorder.record_session("u1", 10, "UTC").await.unwrap();

    let captured = p.publisher.captured();
    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0].0, "session-events");
    assert!(captured[0].1.advance_streak);
    assert!(!captured[1].1.advance_streak);
    assert_eq!(captured[1].1.minutes, 10);
}

#[tokio::test]
async fn other_users_do_not_consume_the_first_session_flag() {
    let p = pipeline();

    p.recorder.record_session("u1", 15, "UTC").await.unwrap();
    p.recorder.record_session("u2", 20, "UTC").await.unwrap();

    let captured = p.publisher.captured();
    assert!(captured[0].1.advance_streak);
    assert!(captured[1].1.advance_streak);
}

#[tokio::test]
async fn unknown_timezone_is_rejected_before_any_write() {
    let p = pipeline();

    let err = p
        .recorder
        .record_session("u1", 15, "Europe/Atlantis")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTimezone(_)));
    assert_eq!(p.store.session_count(), 0);

    let err = p
        .recorder
        .todays_duration("u1", "Europe/Atlantis")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTimezone(_)));
}

#[tokio::test]
async fn publish_failure_keeps_the_recorded_session() {
    let p = pipeline();
    p.publisher.set_should_fail(true);

    p.recorder.record_session("u1", 15, "UTC").await.unwrap();

    assert_eq!(p.store.session_count(), 1);
    assert!(p.publisher.captured().is_empty());
    assert_eq!(p.recorder.todays_duration("u1", "UTC").await.unwrap(), 15);
}

#[tokio::test]
async fn cache_hit_shields_the_session_store() {
    let store = Arc::new(CountingSessionStore::new());
    let recorder = SessionRecorder::new(
        store.clone(),
        Arc::new(MockPublisher::new()),
        Arc::new(MemoryCache::default()),
    );
    store
        .insert(focus_core::Session::new("u1", 25, chrono::Utc::now()))
        .await
        .unwrap();

    assert_eq!(recorder.todays_duration("u1", "UTC").await.unwrap(), 25);
    assert_eq!(recorder.todays_duration("u1", "UTC").await.unwrap(), 25);

    assert_eq!(store.window_queries(), 1);
}

#[tokio::test]
async fn unavailable_cache_degrades_to_store_reads() {
    let cache = Arc::new(UnavailableCache::new());
    let store = Arc::new(focus_store::MemoryStore::new());
    let recorder = SessionRecorder::new(store.clone(), Arc::new(MockPublisher::new()), cache.clone());

    seed_session(&store, "u1", 15, chrono::Utc::now()).await;

    assert_eq!(recorder.todays_duration("u1", "UTC").await.unwrap(), 15);
    assert_eq!(recorder.todays_duration("u1", "UTC").await.unwrap(), 15);
    assert!(cache.get_count() >= 2);
}

#[tokio::test]
async fn non_whole_hour_offsets_aggregate_correctly() {
    let p = pipeline();

    // Asia/Kathmandu sits at UTC+05:45.
    p.recorder
        .record_session("u1", 25, "Asia/Kathmandu")
        .await
        .unwrap();
    assert_eq!(
        p.recorder
            .todays_duration("u1", "Asia/Kathmandu")
            .await
            .unwrap(),
        25
    );
}
