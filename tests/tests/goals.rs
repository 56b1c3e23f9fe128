//! Goal aggregator integration tests.

use uuid::Uuid;

use focus_core::{Error, Goal, SessionRecorded};
use focus_services::SessionEventHandler;

use integration_tests::fixtures::{pipeline, session_goal, streak_goal, TestPipeline};

fn minutes_event(user_id: &str, minutes: i64) -> SessionRecorded {
    SessionRecorded {
        user_id: user_id.to_string(),
        minutes,
        advance_streak: false,
    }
}

async fn reload(p: &TestPipeline, id: Uuid) -> Goal {
    p.goals
        .list_goals("u1")
        .await
        .unwrap()
        .into_iter()
        .find(|g| g.id == id)
        .unwrap()
}

#[tokio::test]
async fn create_and_list_goals() {
    let p = pipeline();

    p.goals.create_goal("u1", session_goal(2, 25)).await.unwrap();
    p.goals.create_goal("u1", streak_goal(5)).await.unwrap();
    p.goals.create_goal("u2", session_goal(1, 10)).await.unwrap();

    assert_eq!(p.goals.list_goals("u1").await.unwrap().len(), 2);
    assert!(p.goals.tracking_goal("u1").await.unwrap().is_none());
}

#[tokio::test]
async fn invalid_draft_surfaces_validation_error() {
    let p = pipeline();

    let err = p
        .goals
        .create_goal("u1", session_goal(0, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::GoalValidation(_)));
    assert!(p.goals.list_goals("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn minutes_fan_out_to_every_active_session_goal() {
    let p = pipeline();

    let short = p.goals.create_goal("u1", session_goal(1, 10)).await.unwrap();
    let long = p.goals.create_goal("u1", session_goal(2, 10)).await.unwrap();

    p.goals
        .on_session_recorded(&minutes_event("u1", 10))
        .await
        .unwrap();

    let short = reload(&p, short.id).await;
    assert!(short.completed);
    assert_eq!(short.progress, 10);

    let long = reload(&p, long.id).await;
    assert!(!long.completed);
    assert_eq!(long.progress, 10);
}

#[tokio::test]
async fn completion_requires_landing_exactly_on_target() {
    let p = pipeline();
    let goal = p.goals.create_goal("u1", session_goal(2, 10)).await.unwrap();

    p.goals
        .on_session_recorded(&minutes_event("u1", 19))
        .await
        .unwrap();
    assert!(!reload(&p, goal.id).await.completed);

    p.goals
        .on_session_recorded(&minutes_event("u1", 1))
        .await
        .unwrap();
    let done = reload(&p, goal.id).await;
    assert!(done.completed);
    assert_eq!(done.progress, 20);

    // Completed is terminal: further sessions change nothing.
    p.goals
        .on_session_recorded(&minutes_event("u1", 5))
        .await
        .unwrap();
    assert_eq!(reload(&p, goal.id).await.progress, 20);
}

#[tokio::test]
async fn overshooting_the_target_leaves_the_goal_active() {
    let p = pipeline();
    let goal = p.goals.create_goal("u1", session_goal(2, 10)).await.unwrap();

    p.goals
        .on_session_recorded(&minutes_event("u1", 19))
        .await
        .unwrap();
    p.goals
        .on_session_recorded(&minutes_event("u1", 2))
        .await
        .unwrap();

    let goal = reload(&p, goal.id).await;
    assert_eq!(goal.progress, 21);
    assert!(!goal.completed);
}

#[tokio::test]
async fn day_streak_goals_advance_only_on_the_flag() {
    let p = pipeline();
    let goal = p.goals.create_goal("u1", streak_goal(2)).await.unwrap();

    p.goals
        .on_session_recorded(&minutes_event("u1", 30))
        .await
        .unwrap();
    assert_eq!(reload(&p, goal.id).await.progress, 0);

    let first = SessionRecorded {
        user_id: "u1".into(),
        minutes: 30,
        advance_streak: true,
    };
    p.goals.on_session_recorded(&first).await.unwrap();
    assert_eq!(reload(&p, goal.id).await.progress, 1);

    p.goals.on_streak_advanced("u1").await.unwrap();
    let done = reload(&p, goal.id).await;
    assert_eq!(done.progress, 2);
    assert!(done.completed);
}

#[tokio::test]
async fn redelivered_event_is_counted_twice() {
    let p = pipeline();
    let goal = p.goals.create_goal("u1", session_goal(2, 10)).await.unwrap();

    // Delivery is at-least-once; a redelivered event applies again.
    let event = minutes_event("u1", 7);
    p.goals.handle(&event).await.unwrap();
    p.goals.handle(&event).await.unwrap();

    assert_eq!(reload(&p, goal.id).await.progress, 14);
}

#[tokio::test]
async fn tracking_is_a_single_slot_per_user() {
    let p = pipeline();
    let first = p.goals.create_goal("u1", session_goal(2, 10)).await.unwrap();
    let second = p.goals.create_goal("u1", streak_goal(3)).await.unwrap();

    p.goals.track_goal(first.id).await.unwrap();
    assert_eq!(
        p.goals.tracking_goal("u1").await.unwrap().unwrap().id,
        first.id
    );

    p.goals.track_goal(second.id).await.unwrap();
    assert_eq!(
        p.goals.tracking_goal("u1").await.unwrap().unwrap().id,
        second.id
    );
    assert!(!reload(&p, first.id).await.tracked);
}

#[tokio::test]
async fn tracking_an_unknown_goal_is_not_found() {
    let p = pipeline();
    let err = p.goals.track_goal(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn deleting_goals() {
    let p = pipeline();
    let goal = p.goals.create_goal("u1", streak_goal(3)).await.unwrap();

    p.goals.delete_goal(goal.id).await.unwrap();
    assert!(p.goals.list_goals("u1").await.unwrap().is_empty());

    let err = p.goals.delete_goal(goal.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}
