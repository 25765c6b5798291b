#![forbid(unsafe_code)]

pub mod deck_source;
pub mod error;
pub mod sessions;

pub use recall_core::Clock;

pub use deck_source::{load_deck_file, load_deck_json};
pub use error::{DeckSourceError, SessionError};
pub use sessions::{SessionManager, SessionWorkflow};
