//! End-to-end flow: recorder → event channel (mocked) → streak tracker
//! and goal aggregator, as independent consumers of the same stream.

use integration_tests::fixtures::{pipeline, session_goal, streak_goal};

#[tokio::test]
async fn full_day_flow() {
    let p = pipeline();
    let tz = "Europe/Sofia";

    let day_goal = p.goals.create_goal("u1", streak_goal(1)).await.unwrap();
    let focus_goal = p.goals.create_goal("u1", session_goal(5, 5)).await.unwrap();

    // First session of the day.
    p.recorder.record_session("u1", 15, tz).await.unwrap();
    assert_eq!(p.recorder.todays_duration("u1", tz).await.unwrap(), 15);
    assert!(p.publisher.last().unwrap().advance_streak);

    p.deliver_captured().await;
    assert_eq!(p.streaks.current_streak("u1", tz).await.unwrap(), 1);

    let goals = p.goals.list_goals("u1").await.unwrap();
    let day = goals.iter().find(|g| g.id == day_goal.id).unwrap();
    assert!(day.completed);
    let focus = goals.iter().find(|g| g.id == focus_goal.id).unwrap();
    assert_eq!(focus.progress, 15);
    assert!(!focus.completed);

    // Second session the same local day.
    p.recorder.record_session("u1", 10, tz).await.unwrap();
    assert_eq!(p.recorder.todays_duration("u1", tz).await.unwrap(), 25);
    assert!(!p.publisher.last().unwrap().advance_streak);

    p.deliver_captured().await;
    assert_eq!(p.streaks.current_streak("u1", tz).await.unwrap(), 1);

    let goals = p.goals.list_goals("u1").await.unwrap();
    let focus = goals.iter().find(|g| g.id == focus_goal.id).unwrap();
    assert_eq!(focus.progress, 25);
    assert!(focus.completed);
}

#[tokio::test]
async fn users_are_isolated() {
    let p = pipeline();

    p.recorder.record_session("u1", 30, "UTC").await.unwrap();
    p.recorder.record_session("u2", 40, "Asia/Kathmandu").await.unwrap();
    p.deliver_captured().await;

    assert_eq!(p.recorder.todays_duration("u1", "UTC").await.unwrap(), 30);
    assert_eq!(
        p.recorder
            .todays_duration("u2", "Asia/Kathmandu")
            .await
            .unwrap(),
        40
    );
    assert_eq!(p.streaks.current_streak("u1", "UTC").await.unwrap(), 1);
    assert_eq!(
        p.streaks
            .current_streak("u2", "Asia/Kathmandu")
            .await
            .unwrap(),
        1
    );
}
