use std::collections::HashSet;

use thiserror::Error;

use crate::model::card::Card;
use crate::model::ids::CardId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("duplicate card id in deck: {0}")]
    DuplicateCardId(CardId),
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Per-deck options applied when a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub shuffle: bool,
    pub show_timer: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            show_timer: true,
        }
    }
}

//
// ─── DECK ──────────────────────────────────────────────────────────────────────
//

/// Named, ordered collection of cards plus session settings.
///
/// Card ids are unique within a deck; `Deck::new` rejects duplicates so the
/// id-keyed session state can never alias two cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    title: String,
    cards: Vec<Card>,
    settings: SessionSettings,
}

impl Deck {
    /// Build a deck from its title, cards and settings.
    ///
    /// Any title is accepted, including an empty one. An empty card list is
    /// allowed here; starting a session from it is not.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::DuplicateCardId` when two cards share an id.
    pub fn new(
        title: impl Into<String>,
        cards: Vec<Card>,
        settings: SessionSettings,
    ) -> Result<Self, DeckError> {
        let title = title.into();
        let mut seen = HashSet::with_capacity(cards.len());
        for card in &cards {
            if !seen.insert(card.id()) {
                return Err(DeckError::DuplicateCardId(card.id()));
            }
        }

        Ok(Self {
            title,
            cards,
            settings,
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: u64) -> Card {
        Card::new(CardId::new(id), format!("Q{id}"), format!("A{id}"), None)
    }

    #[test]
    fn deck_accepts_blank_title() {
        let deck = Deck::new("", vec![card(1)], SessionSettings::default()).unwrap();
        assert_eq!(deck.title(), "");
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn deck_rejects_duplicate_ids() {
        let err = Deck::new(
            "Verbs",
            vec![card(1), card(2), card(1)],
            SessionSettings::default(),
        )
        .unwrap_err();
        assert_eq!(err, DeckError::DuplicateCardId(CardId::new(1)));
    }

    #[test]
    fn deck_keeps_card_order() {
        let deck = Deck::new(
            "Verbs",
            vec![card(3), card(1), card(2)],
            SessionSettings::default(),
        )
        .unwrap();
        let ids: Vec<u64> = deck.cards().iter().map(|c| c.id().value()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(deck.len(), 3);
    }

    #[test]
    fn empty_card_list_is_a_valid_deck() {
        let deck = Deck::new("Empty", Vec::new(), SessionSettings::default()).unwrap();
        assert!(deck.is_empty());
    }
}
