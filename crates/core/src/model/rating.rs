use serde::{Deserialize, Serialize};

/// The learner's self-assessment for a card.
///
/// `Unrated` is the state before any judgment and the placeholder emitted for
/// cards left unrated when a session finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardRating {
    Known,
    Unknown,
    #[default]
    Unrated,
}

impl CardRating {
    /// True for `Known` and `Unknown`.
    #[must_use]
    pub fn is_rated(self) -> bool {
        !matches!(self, CardRating::Unrated)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CardRating::Known => "known",
            CardRating::Unknown => "unknown",
            CardRating::Unrated => "unrated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_judgments_count_as_rated() {
        assert!(CardRating::Known.is_rated());
        assert!(CardRating::Unknown.is_rated());
        assert!(!CardRating::Unrated.is_rated());
        assert_eq!(CardRating::default(), CardRating::Unrated);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&CardRating::Unknown).unwrap();
        assert_eq!(json, "\"unknown\"");
        let parsed: CardRating = serde_json::from_str("\"unrated\"").unwrap();
        assert_eq!(parsed, CardRating::Unrated);
    }
}
