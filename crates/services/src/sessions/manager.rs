use chrono::{DateTime, Utc};
use log::{debug, info};
use rand::Rng;
use std::collections::HashMap;
use std::fmt;

use recall_core::model::{
    Card, CardId, CardRating, CardResult, Deck, DeckProgress, SessionResult, SessionStatistics,
};
use recall_core::time::elapsed_ms;
use storage::SessionPersistence;

use super::shuffle::shuffle_cards;
use crate::error::SessionError;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One pass through a deck: cursor, reveals, ratings and timing.
///
/// The working card order is fixed at construction (optionally shuffled once).
/// Every time-dependent call takes `now` from the caller, usually a `Clock`
/// owned by the workflow layer.
///
/// Reveal instants double as the revealed set: a card is revealed exactly
/// when it has an entry in `reveal_times`.
pub struct SessionManager {
    deck: Deck,
    cards: Vec<Card>,
    cursor: usize,
    session_started_at: DateTime<Utc>,
    card_entered_at: DateTime<Utc>,
    results: HashMap<CardId, CardResult>,
    reveal_times: HashMap<CardId, DateTime<Utc>>,
}

impl SessionManager {
    /// Start a session over `deck`, shuffling with the thread-local RNG when
    /// the deck asks for it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyDeck` if the deck has no cards.
    pub fn new(deck: Deck, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        Self::with_rng(deck, started_at, &mut rand::rng())
    }

    /// Same as [`SessionManager::new`] with an explicit RNG.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyDeck` if the deck has no cards.
    pub fn with_rng<R: Rng + ?Sized>(
        deck: Deck,
        started_at: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        if deck.is_empty() {
            return Err(SessionError::EmptyDeck);
        }

        let mut cards = deck.cards().to_vec();
        if deck.settings().shuffle {
            shuffle_cards(&mut cards, rng);
        }

        info!(
            "session started for {:?} with {} cards (shuffle: {})",
            deck.title(),
            cards.len(),
            deck.settings().shuffle
        );

        Ok(Self {
            deck,
            cards,
            cursor: 0,
            session_started_at: started_at,
            card_entered_at: started_at,
            results: HashMap::new(),
            reveal_times: HashMap::new(),
        })
    }

    // ─── queries ──────────────────────────────────────────────────────────────

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Cards in working order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn current_card(&self) -> &Card {
        // Construction rejects empty decks and navigation keeps the cursor in range.
        &self.cards[self.cursor]
    }

    /// 0-based position of the current card.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.cursor + 1 < self.cards.len()
    }

    #[must_use]
    pub fn is_answer_revealed(&self) -> bool {
        self.reveal_times.contains_key(&self.current_card().id())
    }

    #[must_use]
    pub fn current_card_rating(&self) -> CardRating {
        self.results
            .get(&self.current_card().id())
            .map_or(CardRating::Unrated, |r| r.rating)
    }

    /// True once every card in the session has a rating, whatever the order.
    #[must_use]
    pub fn all_cards_rated(&self) -> bool {
        self.results.len() == self.cards.len()
    }

    #[must_use]
    pub fn rated_count(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn result_for(&self, card_id: CardId) -> Option<&CardResult> {
        self.results.get(&card_id)
    }

    #[must_use]
    pub fn reveal_time_for(&self, card_id: CardId) -> Option<DateTime<Utc>> {
        self.reveal_times.get(&card_id).copied()
    }

    #[must_use]
    pub fn current_card_elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        elapsed_ms(self.card_entered_at, now)
    }

    #[must_use]
    pub fn total_elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        elapsed_ms(self.session_started_at, now)
    }

    #[must_use]
    pub fn statistics(&self, now: DateTime<Utc>) -> SessionStatistics {
        let (known_count, unknown_count) =
            self.results
                .values()
                .fold((0_usize, 0_usize), |(known, unknown), r| match r.rating {
                    CardRating::Known => (known + 1, unknown),
                    CardRating::Unknown => (known, unknown + 1),
                    CardRating::Unrated => (known, unknown),
                });

        SessionStatistics {
            current_index: self.cursor + 1,
            total_cards: self.cards.len(),
            known_count,
            unknown_count,
            current_card_elapsed_ms: self.current_card_elapsed_ms(now),
            total_elapsed_ms: self.total_elapsed_ms(now),
        }
    }

    /// Cards currently rated `Unknown`, in working order.
    #[must_use]
    pub fn difficult_cards(&self) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|card| {
                self.results
                    .get(&card.id())
                    .is_some_and(|r| r.rating == CardRating::Unknown)
            })
            .collect()
    }

    /// Completion flags derived from the cards rated so far.
    #[must_use]
    pub fn deck_progress(&self) -> DeckProgress {
        DeckProgress::from_rated(self.results.keys().copied())
    }

    // ─── navigation ───────────────────────────────────────────────────────────

    /// Step back one card. A no-op on the first card.
    pub fn go_to_previous(&mut self, now: DateTime<Utc>) {
        if self.can_go_previous() {
            self.cursor -= 1;
            self.card_entered_at = now;
            debug!("moved to card {}/{}", self.cursor + 1, self.cards.len());
        }
    }

    /// Step forward one card. A no-op on the last card.
    pub fn go_to_next(&mut self, now: DateTime<Utc>) {
        if self.can_go_next() {
            self.cursor += 1;
            self.card_entered_at = now;
            debug!("moved to card {}/{}", self.cursor + 1, self.cards.len());
        }
    }

    // ─── reveal / rate ────────────────────────────────────────────────────────

    /// Show the answer of the current card. Repeated calls keep the first instant.
    pub fn reveal_answer(&mut self, now: DateTime<Utc>) {
        let id = self.current_card().id();
        self.reveal_times.entry(id).or_insert_with(|| {
            debug!("revealed card {id}");
            now
        });
    }

    /// Record a judgment for the current card, replacing any earlier one.
    ///
    /// Time is measured from the reveal instant when the answer was shown,
    /// otherwise from when the card was entered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidRating` for `CardRating::Unrated`.
    pub fn rate_card(
        &mut self,
        rating: CardRating,
        now: DateTime<Utc>,
    ) -> Result<&CardResult, SessionError> {
        if !rating.is_rated() {
            return Err(SessionError::InvalidRating);
        }

        let id = self.current_card().id();
        let anchor = self
            .reveal_times
            .get(&id)
            .copied()
            .unwrap_or(self.card_entered_at);
        let time_spent_ms = elapsed_ms(anchor, now);

        let result = CardResult::new(id, rating, time_spent_ms);
        if let Some(previous) = self.results.insert(id, result) {
            debug!(
                "card {id} re-rated {} -> {}",
                previous.rating.as_str(),
                rating.as_str()
            );
        } else {
            debug!("card {id} rated {} in {time_spent_ms} ms", rating.as_str());
        }

        Ok(&self.results[&id])
    }

    // ─── finish ───────────────────────────────────────────────────────────────

    /// Assemble the session result without persisting it.
    ///
    /// One entry per card in working order; cards never rated get an
    /// `Unrated`, 0 ms placeholder.
    #[must_use]
    pub fn build_result(&self, now: DateTime<Utc>) -> SessionResult {
        let results = self
            .cards
            .iter()
            .map(|card| {
                self.results
                    .get(&card.id())
                    .copied()
                    .unwrap_or_else(|| CardResult::unrated(card.id()))
            })
            .collect();

        SessionResult::new(self.deck.title(), self.total_elapsed_ms(now), results, now)
    }

    /// Build the result and hand it to `persistence`.
    ///
    /// Writes, in order: the last session for this deck title, the history
    /// append, and the deck progress. Safe to call again; each call recomputes
    /// and re-persists.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` with the first failing write.
    pub async fn finish_session(
        &self,
        persistence: &dyn SessionPersistence,
        now: DateTime<Utc>,
    ) -> Result<SessionResult, SessionError> {
        let result = self.build_result(now);
        let title = self.deck.title();

        persistence.save_last_session(title, &result).await?;
        persistence.append_session_result(&result).await?;
        persistence
            .save_deck_progress(title, &self.deck_progress())
            .await?;

        info!(
            "session finished for {title:?}: {}/{} rated, {} known, {} ms",
            result.rated_count(),
            result.total_cards(),
            result.known_count(),
            result.total_time_ms()
        );

        Ok(result)
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("deck_title", &self.deck.title())
            .field("cards_len", &self.cards.len())
            .field("cursor", &self.cursor)
            .field("results_len", &self.results.len())
            .field("revealed_len", &self.reveal_times.len())
            .field("session_started_at", &self.session_started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
