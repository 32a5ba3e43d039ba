use super::*;
use tempfile::TempDir;
use timer_core::{resolve_attempt, AttemptRequest, BlockList, Player, PlayerStore};
use uuid::Uuid;

fn test_store() -> (SqliteStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open(dir.path()).unwrap();
    (store, dir)
}

fn sample_player(name: &str, first: u32) -> Player {
    Player::from_first_perfect(name, first, None, 1_700_000_000)
}

#[test]
fn create_and_get_by_name() {
    let (store, _dir) = test_store();
    let player = sample_player("Ada", 4);
    store.create(&player).unwrap();

    let loaded = store.get_by_name("Ada").unwrap().unwrap();
    assert_eq!(loaded, player);
    assert!(store.get_by_name("ada").unwrap().is_none());
}

#[test]
fn duplicate_name_is_a_conflict() {
    let (store, _dir) = test_store();
    store.create(&sample_player("Ada", 4)).unwrap();

    let err = store.create(&sample_player("Ada", 2)).unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)), "{err:?}");
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn record_perfect_folds_counters_and_message() {
    let (store, _dir) = test_store();
    let player = sample_player("Ada", 4);
    store.create(&player).unwrap();

    let (folded, improved) = store
        .record_perfect("Ada", 2, Some("catch me"))
        .unwrap()
        .unwrap();
    assert!(improved);
    assert_eq!(folded.id, player.id);
    assert_eq!(folded.first_perfect_attempt, Some(2));
    assert_eq!(folded.perfect_attempts, 2);
    assert_eq!(folded.total_attempts, 6);
    assert_eq!(folded.message, "catch me");

    let (folded, improved) = store.record_perfect("Ada", 9, None).unwrap().unwrap();
    assert!(!improved);
    assert_eq!(folded.first_perfect_attempt, Some(2));
    assert_eq!(folded.perfect_attempts, 3);
    assert_eq!(folded.total_attempts, 15);
    assert_eq!(folded.message, "catch me");
    assert_eq!(store.get_by_name("Ada").unwrap(), Some(folded));
}

#[test]
fn record_perfect_on_unranked_row_sets_first_perfect() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut pending = sample_player("pending", 1);
    pending.first_perfect_attempt = None;
    store.create(&pending).unwrap();

    let (folded, improved) = store.record_perfect("pending", 6, None).unwrap().unwrap();
    assert!(improved);
    assert_eq!(folded.first_perfect_attempt, Some(6));
    assert_eq!(store.rank(pending.id).unwrap(), Some(1));
}

#[test]
fn record_perfect_for_unknown_name_is_none() {
    let (store, _dir) = test_store();
    assert!(store.record_perfect("ghost", 1, None).unwrap().is_none());
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn set_message_touches_only_the_message() {
    let (store, _dir) = test_store();
    let player = sample_player("Ada", 4);
    store.create(&player).unwrap();
    store.record_perfect("Ada", 7, None).unwrap();

    let updated = store.set_message(player.id, "catch me").unwrap();
    assert_eq!(updated.message, "catch me");
    assert_eq!(updated.first_perfect_attempt, Some(4));
    assert_eq!(updated.perfect_attempts, 2);
    assert_eq!(updated.total_attempts, 11);

    let err = store.set_message(Uuid::new_v4(), "hi").unwrap_err();
    assert!(matches!(err, StoreError::Backend(_)));
}

#[test]
fn concurrent_perfect_attempts_lose_nothing() {
    let (store, _dir) = test_store();
    store.create(&sample_player("Ada", 50)).unwrap();
    let filter = BlockList::default();

    std::thread::scope(|scope| {
        for attempts in 1..=8u32 {
            let (store, filter) = (&store, &filter);
            scope.spawn(move || {
                let request = AttemptRequest {
                    player_name: "Ada".to_string(),
                    time: 10.0,
                    attempts: attempts * 3,
                    message: None,
                };
                resolve_attempt(store, filter, &request, 0).unwrap();
            });
        }
    });

    let ada = store.get_by_name("Ada").unwrap().unwrap();
    assert_eq!(ada.first_perfect_attempt, Some(3));
    assert_eq!(ada.perfect_attempts, 9);
    assert_eq!(ada.total_attempts, 50 + 3 * 36);
}

#[test]
fn ranking_breaks_ties_by_creation_order() {
    let (store, _dir) = test_store();
    let early = sample_player("early", 5);
    let late = sample_player("late", 5);
    let best = sample_player("best", 1);
    store.create(&early).unwrap();
    store.create(&late).unwrap();
    store.create(&best).unwrap();

    let names: Vec<_> = store
        .ranked()
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["best", "early", "late"]);

    assert_eq!(store.rank(best.id).unwrap(), Some(1));
    assert_eq!(store.rank(early.id).unwrap(), Some(2));
    assert_eq!(store.rank(late.id).unwrap(), Some(3));
    assert_eq!(store.top().unwrap().map(|p| p.id), Some(best.id));
}

#[test]
fn unknown_player_is_unranked() {
    let (store, _dir) = test_store();
    store.create(&sample_player("Ada", 4)).unwrap();
    assert_eq!(store.rank(Uuid::new_v4()).unwrap(), None);
}

#[test]
fn unranked_rows_are_excluded() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut pending = sample_player("pending", 1);
    pending.first_perfect_attempt = None;
    store.create(&pending).unwrap();

    assert!(store.ranked().unwrap().is_empty());
    assert!(store.top().unwrap().is_none());
    assert_eq!(store.rank(pending.id).unwrap(), None);
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = SqliteStore::open(dir.path()).unwrap();
        store.create(&sample_player("Ada", 3)).unwrap();
    }

    let store = SqliteStore::open(dir.path()).unwrap();
    let top = store.top().unwrap().unwrap();
    assert_eq!(top.name, "Ada");
    assert_eq!(top.first_perfect_attempt, Some(3));
}

#[test]
fn resolver_runs_against_sqlite() {
    let store = SqliteStore::open_in_memory().unwrap();
    let filter = BlockList::default();
    let submit = |name: &str, attempts: u32| {
        let request = AttemptRequest {
            player_name: name.to_string(),
            time: 10.0,
            attempts,
            message: None,
        };
        resolve_attempt(&store, &filter, &request, 0).unwrap()
    };

    assert_eq!(submit("A", 5).rank, Some(1));
    assert_eq!(submit("B", 3).rank, Some(1));
    let a = store.get_by_name("A").unwrap().unwrap();
    assert_eq!(store.rank(a.id).unwrap(), Some(2));

    let outcome = submit("A", 2);
    assert_eq!(outcome.rank, Some(1));
    assert_eq!(outcome.is_new_record, Some(true));

    let outcome = submit("A", 10);
    assert_eq!(outcome.rank, Some(1));
    assert_eq!(outcome.is_new_record, Some(false));
    let a = outcome.player.unwrap();
    assert_eq!(a.first_perfect_attempt, Some(2));
    assert_eq!(a.perfect_attempts, 3);
}
