use std::sync::Arc;

use chrono::Duration;

use super::*;
use crate::memory::InMemoryMatchStore;

fn log() -> MatchLog<InMemoryMatchStore> {
    MatchLog::new(InMemoryMatchStore::new(), Roster::default())
}

#[tokio::test]
async fn rejects_dish_playing_itself() {
    let log = log();
    for dish in [1, 17, 31] {
        let err = log
            .append(1, DishId(dish), DishId(dish))
            .await
            .expect_err("should fail");
        assert!(matches!(err, TournamentError::InvalidMatch(_)));
    }
    assert!(log.all().await.expect("all").is_empty());
}

#[tokio::test]
async fn rejects_dishes_outside_roster() {
    let log = log();
    for (winner, loser) in [(0, 1), (1, 32), (-3, 4)] {
        let err = log
            .append(1, DishId(winner), DishId(loser))
            .await
            .expect_err("should fail");
        assert!(matches!(err, TournamentError::InvalidMatch(_)));
    }
    assert!(log.all().await.expect("all").is_empty());
}

#[tokio::test]
async fn rejects_rounds_outside_bracket_depth() {
    let log = log();
    for round in [0, 6, u32::MAX] {
        let err = log
            .append(round, DishId(1), DishId(2))
            .await
            .expect_err("should fail");
        assert!(matches!(err, TournamentError::InvalidMatch(_)));
    }
    log.append(5, DishId(1), DishId(2)).await.expect("final");
}

#[tokio::test]
async fn remove_last_on_empty_log_fails() {
    let log = log();
    let err = log.remove_last().await.expect_err("should fail");
    assert!(matches!(err, TournamentError::EmptyLog));
}

#[tokio::test]
async fn duplicates_are_kept_and_only_the_latest_is_removed() {
    let log = log();
    let first = log.append(1, DishId(5), DishId(9)).await.expect("first");
    let second = log.append(1, DishId(5), DishId(9)).await.expect("second");
    assert_ne!(first.match_id, second.match_id);
    assert_eq!(log.all().await.expect("all").len(), 2);

    let removed = log.remove_last().await.expect("remove");
    assert_eq!(removed.match_id, second.match_id);
    assert_eq!(log.all().await.expect("all"), vec![first]);
}

#[tokio::test]
async fn remove_last_ignores_round_numbers() {
    let log = log();
    log.append(3, DishId(1), DishId(2)).await.expect("append");
    let latest = log.append(1, DishId(3), DishId(4)).await.expect("append");
    let removed = log.remove_last().await.expect("remove");
    assert_eq!(removed, latest);
}

#[tokio::test]
async fn timestamps_never_go_backwards() {
    let log = log();
    let future = Utc::now().trunc_subsecs(TIMESTAMP_DIGITS) + Duration::hours(1);
    let planted = log
        .store()
        .insert_match(1, DishId(1), DishId(2), future)
        .await
        .expect("plant");

    let appended = log.append(1, DishId(3), DishId(4)).await.expect("append");
    assert_eq!(appended.recorded_at, future);

    let removed = log.remove_last().await.expect("remove");
    assert_eq!(removed.match_id, appended.match_id);
    assert_eq!(log.all().await.expect("all"), vec![planted]);
}

#[tokio::test]
async fn concurrent_appends_are_serialized() {
    let log = Arc::new(log());
    let mut handles = Vec::new();
    for dish in 1..=20 {
        let log = log.clone();
        handles.push(tokio::spawn(async move {
            log.append(1, DishId(dish), DishId(dish + 1)).await
        }));
    }
    for handle in handles {
        handle.await.expect("join").expect("append");
    }

    let records = log.all().await.expect("all");
    assert_eq!(records.len(), 20);
    assert!(records
        .windows(2)
        .all(|pair| pair[0].recorded_at <= pair[1].recorded_at
            && pair[0].match_id < pair[1].match_id));
}
