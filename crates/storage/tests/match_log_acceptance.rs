use shared::domain::{DishId, DishStatus, Roster};
use storage::Storage;
use tournament::{Tournament, TournamentError};

async fn tournament() -> Tournament<Storage> {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    Tournament::new(storage, Roster::default())
}

#[tokio::test]
async fn duplicate_matches_are_logged_and_retracted_one_at_a_time() {
    let tournament = tournament().await;

    let first = tournament
        .add_match(1, DishId(5), DishId(9))
        .await
        .expect("first");
    let second = tournament
        .add_match(1, DishId(5), DishId(9))
        .await
        .expect("second");
    assert_eq!(tournament.matches().await.expect("matches").len(), 2);

    let removed = tournament.remove_last().await.expect("remove");
    assert_eq!(removed.match_id, second.match_id);
    assert_eq!(
        tournament.matches().await.expect("matches"),
        vec![first]
    );
}

#[tokio::test]
async fn self_match_is_rejected_without_touching_sqlite() {
    let tournament = tournament().await;
    let err = tournament
        .add_match(1, DishId(8), DishId(8))
        .await
        .expect_err("should fail");
    assert!(matches!(err, TournamentError::InvalidMatch(_)));
    assert_eq!(tournament.store().match_count().await.expect("count"), 0);
}

#[tokio::test]
async fn append_then_remove_restores_status_and_bracket() {
    let tournament = tournament().await;
    tournament
        .add_match(1, DishId(1), DishId(2))
        .await
        .expect("match");
    tournament
        .add_match(1, DishId(3), DishId(4))
        .await
        .expect("match");

    let status_before = tournament.status().await.expect("status");
    let bracket_before = tournament.bracket_table().await.expect("bracket");

    tournament
        .add_match(2, DishId(1), DishId(3))
        .await
        .expect("match");
    let bracket_after = tournament.bracket_table().await.expect("bracket");
    assert_eq!(bracket_after.columns.len(), 2);
    let height = bracket_after.height();
    assert!(bracket_after
        .columns
        .iter()
        .all(|column| column.cells.len() == height));

    tournament.remove_last().await.expect("remove");
    assert_eq!(tournament.status().await.expect("status"), status_before);
    assert_eq!(
        tournament.bracket_table().await.expect("bracket"),
        bracket_before
    );
}

#[tokio::test]
async fn empty_log_scenario() {
    let tournament = tournament().await;
    let status = tournament.status().await.expect("status");
    assert!(status.values().all(|status| *status == DishStatus::Neutral));
    assert!(tournament.bracket_table().await.expect("bracket").is_empty());
    let err = tournament.remove_last().await.expect_err("should fail");
    assert!(matches!(err, TournamentError::EmptyLog));
}
