use chrono::Duration;
use recall_core::model::{CardId, CardRating};
use recall_core::time::fixed_now;
use services::{Clock, SessionWorkflow, load_deck_json};
use storage::SessionStore;

const DECK: &str = r#"{
    "deckTitle": "Smoke Deck",
    "cards": [
        {"id": 10, "front": "Q10", "back": "A10"},
        {"id": 20, "front": "Q20", "back": "A20"},
        {"id": 30, "front": "Q30", "back": "A30"}
    ],
    "session": {"shuffle": false, "showTimer": true}
}"#;

#[tokio::test]
async fn partial_session_persists_placeholders() {
    let store = SessionStore::in_memory();
    let mut clock = Clock::fixed(fixed_now());
    let workflow = SessionWorkflow::new(clock, store.clone());

    let deck = load_deck_json(DECK).unwrap();
    let mut session = workflow.start(deck).unwrap();

    clock.advance(Duration::seconds(1));
    session.reveal_answer(clock.now());
    clock.advance(Duration::seconds(3));
    session.rate_card(CardRating::Known, clock.now()).unwrap();

    clock.advance(Duration::seconds(1));
    session.go_to_next(clock.now());
    session.go_to_next(clock.now());
    clock.advance(Duration::seconds(2));
    session.rate_card(CardRating::Unknown, clock.now()).unwrap();

    assert!(!session.all_cards_rated());
    let stats = session.statistics(clock.now());
    assert_eq!(stats.current_index, 3);
    assert_eq!((stats.known_count, stats.unknown_count), (1, 1));

    let result = session.finish_session(&store, clock.now()).await.unwrap();
    let entries: Vec<(u64, CardRating, u64)> = result
        .results()
        .iter()
        .map(|r| (r.card_id.value(), r.rating, r.time_spent_ms))
        .collect();
    assert_eq!(
        entries,
        vec![
            (10, CardRating::Known, 3_000),
            (20, CardRating::Unrated, 0),
            (30, CardRating::Unknown, 2_000),
        ]
    );
    assert_eq!(result.total_time_ms(), 7_000);
    assert_eq!(result.average_rated_time_ms(), 2_500);
    assert_eq!(result.difficult_card_ids(), vec![CardId::new(30)]);

    let history = workflow.history().await.unwrap();
    assert_eq!(history, vec![result]);
    let progress = workflow.deck_progress("Smoke Deck").await.unwrap().unwrap();
    assert_eq!(progress.len(), 2);
    assert!(!progress.is_rated(CardId::new(20)));
}

#[tokio::test]
async fn full_session_marks_every_card() {
    let store = SessionStore::in_memory();
    let workflow = SessionWorkflow::new(Clock::fixed(fixed_now()), store);
    let mut session = workflow.start(load_deck_json(DECK).unwrap()).unwrap();
    let now = workflow.clock().now();

    loop {
        session.reveal_answer(now);
        session.rate_card(CardRating::Known, now).unwrap();
        if !session.can_go_next() {
            break;
        }
        session.go_to_next(now);
    }
    assert!(session.all_cards_rated());
    assert!(session.difficult_cards().is_empty());

    let result = workflow.finish(&session).await.unwrap();
    assert_eq!(result.known_count(), 3);
    let progress = workflow.deck_progress("Smoke Deck").await.unwrap().unwrap();
    assert!([10, 20, 30].iter().all(|id| progress.is_rated(CardId::new(*id))));
}
