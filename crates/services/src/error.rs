//! Shared error types for the services crate.

use thiserror::Error;

use recall_core::model::DeckError;
use storage::StorageError;

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("cannot start a session from an empty deck")]
    EmptyDeck,
    #[error("a card can only be rated known or unknown")]
    InvalidRating,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while loading a deck definition.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeckSourceError {
    #[error("cannot read deck file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid deck json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Deck(#[from] DeckError),
}
