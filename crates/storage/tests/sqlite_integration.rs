use std::sync::Arc;

use recall_core::model::{CardId, CardRating, CardResult, DeckProgress, SessionResult};
use recall_core::time::fixed_now;
use storage::repository::{KeyValueStore, SessionPersistence};
use storage::session_store::last_session_key;
use storage::sqlite::{LATEST_VERSION, SqliteRepository};
use storage::SessionStore;

fn result(title: &str, total: u64) -> SessionResult {
    SessionResult::new(
        title,
        total,
        vec![
            CardResult::new(CardId::new(1), CardRating::Known, 2_000),
            CardResult::new(CardId::new(2), CardRating::Unknown, 4_500),
            CardResult::unrated(CardId::new(3)),
        ],
        fixed_now(),
    )
}

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    SqliteRepository::open(&url).await.expect("open")
}

#[tokio::test]
async fn sqlite_roundtrips_session_records() {
    let repo = connect("memdb_roundtrip").await;
    let store = SessionStore::new(Arc::new(repo));

    let first = result("Verbs", 60_000);
    store.save_last_session("Verbs", &first).await.unwrap();
    store.append_session_result(&first).await.unwrap();
    store.append_session_result(&result("Nouns", 30_000)).await.unwrap();
    store
        .save_deck_progress("Verbs", &DeckProgress::from_rated([CardId::new(1), CardId::new(2)]))
        .await
        .unwrap();

    let last = store.get_last_session("Verbs").await.unwrap().unwrap();
    assert_eq!(last, first);

    let history = store.get_all_session_results().await.unwrap();
    let titles: Vec<&str> = history.iter().map(SessionResult::deck_title).collect();
    assert_eq!(titles, vec!["Verbs", "Nouns"]);

    let progress = store.get_deck_progress("Verbs").await.unwrap().unwrap();
    assert!(progress.is_rated(CardId::new(2)));
    assert!(!progress.is_rated(CardId::new(3)));
}

#[tokio::test]
async fn sqlite_treats_malformed_payload_as_absent() {
    let repo = connect("memdb_malformed").await;
    repo.set(&last_session_key("Verbs"), "{broken").await.unwrap();
    let store = SessionStore::new(Arc::new(repo));

    assert_eq!(store.get_last_session("Verbs").await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_remove_prefix_matches_literally() {
    let repo = connect("memdb_prefix").await;
    repo.set("recall_a", "1").await.unwrap();
    repo.set("recallXb", "2").await.unwrap();

    let removed = repo.remove_prefix("recall_").await.unwrap();
    assert_eq!(removed, 1);
    assert_eq!(repo.get("recallXb").await.unwrap().as_deref(), Some("2"));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = connect("memdb_migrate").await;
    assert_eq!(repo.schema_version().await.unwrap(), LATEST_VERSION);

    repo.migrate().await.expect("second migrate");
    assert_eq!(repo.schema_version().await.unwrap(), LATEST_VERSION);
    repo.set("k", "v").await.unwrap();
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("v"));
}
