//! Deck definitions read from JSON.
//!
//! Shape: `{"deckTitle": .., "cards": [{"id", "front", "back", "tag"?}], "session": {"shuffle", "showTimer"}}`.

use std::path::Path;

use log::debug;
use serde::Deserialize;

use recall_core::model::{Card, CardId, Deck, SessionSettings};

use crate::error::DeckSourceError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeckFile {
    deck_title: String,
    #[serde(default)]
    cards: Vec<CardFile>,
    #[serde(default)]
    session: SessionFile,
}

#[derive(Debug, Deserialize)]
struct CardFile {
    id: u64,
    front: String,
    back: String,
    #[serde(default)]
    tag: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SessionFile {
    shuffle: bool,
    show_timer: bool,
}

impl Default for SessionFile {
    fn default() -> Self {
        let settings = SessionSettings::default();
        Self {
            shuffle: settings.shuffle,
            show_timer: settings.show_timer,
        }
    }
}

/// Parse a deck from its JSON text.
///
/// # Errors
///
/// Returns `DeckSourceError::Parse` for malformed JSON and
/// `DeckSourceError::Deck` for duplicate card ids.
pub fn load_deck_json(json: &str) -> Result<Deck, DeckSourceError> {
    let file: DeckFile = serde_json::from_str(json)?;
    let cards = file
        .cards
        .into_iter()
        .map(|c| Card::new(CardId::new(c.id), c.front, c.back, c.tag))
        .collect();
    let settings = SessionSettings {
        shuffle: file.session.shuffle,
        show_timer: file.session.show_timer,
    };
    let deck = Deck::new(file.deck_title, cards, settings)?;
    debug!("loaded deck {:?} with {} cards", deck.title(), deck.len());
    Ok(deck)
}

/// Read and parse a deck file.
///
/// # Errors
///
/// Returns `DeckSourceError::Io` if the file cannot be read, otherwise as
/// [`load_deck_json`].
pub fn load_deck_file(path: impl AsRef<Path>) -> Result<Deck, DeckSourceError> {
    let text = std::fs::read_to_string(path)?;
    load_deck_json(&text)
}
