use recall_core::model::{Deck, DeckProgress, SessionResult};
use storage::SessionStore;

use super::manager::SessionManager;
use crate::Clock;
use crate::error::SessionError;

/// Starts and finishes sessions against a clock and a store.
///
/// The workflow supplies `now` so drivers can stay clock-agnostic; the
/// returned `SessionManager` is owned by the caller for the whole session.
#[derive(Clone)]
pub struct SessionWorkflow {
    clock: Clock,
    store: SessionStore,
}

impl SessionWorkflow {
    #[must_use]
    pub fn new(clock: Clock, store: SessionStore) -> Self {
        Self { clock, store }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Replace the clock, e.g. to advance a fixed clock between steps.
    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Start a new session for the given deck.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyDeck` if the deck has no cards.
    pub fn start(&self, deck: Deck) -> Result<SessionManager, SessionError> {
        SessionManager::new(deck, self.clock.now())
    }

    /// Finish `session` now and persist its records.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if any write fails.
    pub async fn finish(&self, session: &SessionManager) -> Result<SessionResult, SessionError> {
        session.finish_session(&self.store, self.clock.now()).await
    }

    /// Last finished session for a deck title, if one was stored and is readable.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the backend fails.
    pub async fn last_session(&self, deck_title: &str) -> Result<Option<SessionResult>, SessionError> {
        Ok(self.store.get_last_session(deck_title).await?)
    }

    /// All finished sessions, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the backend fails.
    pub async fn history(&self) -> Result<Vec<SessionResult>, SessionError> {
        Ok(self.store.get_all_session_results().await?)
    }

    /// Completion flags stored for a deck title.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the backend fails.
    pub async fn deck_progress(&self, deck_title: &str) -> Result<Option<DeckProgress>, SessionError> {
        Ok(self.store.get_deck_progress(deck_title).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use recall_core::model::{Card, CardId, CardRating, SessionSettings};
    use recall_core::time::fixed_clock;

    fn build_deck() -> Deck {
        Deck::new(
            "Capitals",
            vec![
                Card::new(CardId::new(1), "France", "Paris", None),
                Card::new(CardId::new(2), "Peru", "Lima", Some("americas".into())),
            ],
            SessionSettings::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn workflow_times_the_session_with_its_clock() {
        let mut workflow = SessionWorkflow::new(fixed_clock(), SessionStore::in_memory());
        let mut session = workflow.start(build_deck()).unwrap();

        let mut clock = workflow.clock();
        clock.advance(Duration::seconds(4));
        session.reveal_answer(clock.now());
        clock.advance(Duration::seconds(2));
        session.rate_card(CardRating::Known, clock.now()).unwrap();
        clock.advance(Duration::seconds(1));
        workflow.set_clock(clock);

        let result = workflow.finish(&session).await.unwrap();
        assert_eq!(result.total_time_ms(), 7_000);
        assert_eq!(result.results()[0].time_spent_ms, 2_000);
        assert_eq!(result.date(), clock.now());

        let last = workflow.last_session("Capitals").await.unwrap().unwrap();
        assert_eq!(last, result);
        assert_eq!(workflow.history().await.unwrap().len(), 1);
        let progress = workflow.deck_progress("Capitals").await.unwrap().unwrap();
        assert!(progress.is_rated(CardId::new(1)));
        assert!(!progress.is_rated(CardId::new(2)));
    }

    #[tokio::test]
    async fn abandoned_session_persists_nothing() {
        let workflow = SessionWorkflow::new(fixed_clock(), SessionStore::in_memory());
        let mut session = workflow.start(build_deck()).unwrap();
        session.rate_card(CardRating::Unknown, workflow.clock().now()).unwrap();
        drop(session);

        assert_eq!(workflow.last_session("Capitals").await.unwrap(), None);
        assert!(workflow.history().await.unwrap().is_empty());
    }
}
