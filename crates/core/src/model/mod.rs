mod card;
mod deck;
mod ids;
mod rating;
mod session;

pub use ids::{CardId, ParseIdError};

pub use card::Card;
pub use deck::{Deck, DeckError, SessionSettings};
pub use rating::CardRating;
pub use session::{CardResult, DeckProgress, SessionResult, SessionStatistics};
