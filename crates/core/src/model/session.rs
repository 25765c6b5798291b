use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{CardId, CardRating};

//
// ─── CARD RESULT ───────────────────────────────────────────────────────────────
//

/// Outcome recorded for a single card in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardResult {
    pub card_id: CardId,
    pub rating: CardRating,
    pub time_spent_ms: u64,
}

impl CardResult {
    #[must_use]
    pub fn new(card_id: CardId, rating: CardRating, time_spent_ms: u64) -> Self {
        Self {
            card_id,
            rating,
            time_spent_ms,
        }
    }

    /// Placeholder for a card that was never rated.
    #[must_use]
    pub fn unrated(card_id: CardId) -> Self {
        Self::new(card_id, CardRating::Unrated, 0)
    }
}

//
// ─── SESSION RESULT ────────────────────────────────────────────────────────────
//

/// Immutable record of a finished session.
///
/// `results` holds exactly one entry per card, in the order the cards were
/// presented (after any shuffle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    deck_title: String,
    total_time_ms: u64,
    results: Vec<CardResult>,
    date: DateTime<Utc>,
}

impl SessionResult {
    #[must_use]
    pub fn new(
        deck_title: impl Into<String>,
        total_time_ms: u64,
        results: Vec<CardResult>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            deck_title: deck_title.into(),
            total_time_ms,
            results,
            date,
        }
    }

    #[must_use]
    pub fn deck_title(&self) -> &str {
        &self.deck_title
    }

    #[must_use]
    pub fn total_time_ms(&self) -> u64 {
        self.total_time_ms
    }

    #[must_use]
    pub fn results(&self) -> &[CardResult] {
        &self.results
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn known_count(&self) -> usize {
        self.count(CardRating::Known)
    }

    #[must_use]
    pub fn unknown_count(&self) -> usize {
        self.count(CardRating::Unknown)
    }

    #[must_use]
    pub fn rated_count(&self) -> usize {
        self.results.iter().filter(|r| r.rating.is_rated()).count()
    }

    /// Mean time spent on rated cards, truncated to whole milliseconds.
    ///
    /// Unrated placeholders are excluded; returns 0 when nothing was rated.
    #[must_use]
    pub fn average_rated_time_ms(&self) -> u64 {
        let (sum, n) = self
            .results
            .iter()
            .filter(|r| r.rating.is_rated())
            .fold((0_u64, 0_u64), |(sum, n), r| {
                (sum.saturating_add(r.time_spent_ms), n + 1)
            });
        if n == 0 { 0 } else { sum / n }
    }

    /// Ids of cards rated `Unknown`, in result order.
    #[must_use]
    pub fn difficult_card_ids(&self) -> Vec<CardId> {
        self.results
            .iter()
            .filter(|r| r.rating == CardRating::Unknown)
            .map(|r| r.card_id)
            .collect()
    }

    fn count(&self, rating: CardRating) -> usize {
        self.results.iter().filter(|r| r.rating == rating).count()
    }
}

//
// ─── STATISTICS ────────────────────────────────────────────────────────────────
//

/// Live snapshot of a running session, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatistics {
    /// 1-based position of the current card.
    pub current_index: usize,
    pub total_cards: usize,
    pub known_count: usize,
    pub unknown_count: usize,
    pub current_card_elapsed_ms: u64,
    pub total_elapsed_ms: u64,
}

//
// ─── DECK PROGRESS ─────────────────────────────────────────────────────────────
//

/// Per-card completion flags for a deck, keyed by card id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckProgress(BTreeMap<CardId, bool>);

impl DeckProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks every given card as rated.
    #[must_use]
    pub fn from_rated(ids: impl IntoIterator<Item = CardId>) -> Self {
        Self(ids.into_iter().map(|id| (id, true)).collect())
    }

    pub fn set(&mut self, id: CardId, rated: bool) {
        self.0.insert(id, rated);
    }

    #[must_use]
    pub fn is_rated(&self, id: CardId) -> bool {
        self.0.get(&id).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CardId, bool)> + '_ {
        self.0.iter().map(|(id, rated)| (*id, *rated))
    }
}

impl FromIterator<(CardId, bool)> for DeckProgress {
    fn from_iter<I: IntoIterator<Item = (CardId, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
