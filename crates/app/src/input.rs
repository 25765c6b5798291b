use recall_core::model::CardRating;

/// One keystroke command typed at the session prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Next,
    Previous,
    Reveal,
    Known,
    Unknown,
    Finish,
    Quit,
    Help,
}

impl Action {
    /// Parse a trimmed input line. Full words and first letters both work.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "n" | "next" => Some(Self::Next),
            "p" | "prev" | "previous" => Some(Self::Previous),
            "r" | "reveal" | "" => Some(Self::Reveal),
            "k" | "known" => Some(Self::Known),
            "u" | "unknown" => Some(Self::Unknown),
            "f" | "finish" => Some(Self::Finish),
            "q" | "quit" => Some(Self::Quit),
            "h" | "?" | "help" => Some(Self::Help),
            _ => None,
        }
    }
}

pub const HELP: &str =
    "[r]eveal (or Enter)  [k]nown  [u]nknown  [n]ext  [p]revious  [f]inish  [q]uit";

/// Why a known/unknown keystroke was refused on the current card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingBlocked {
    NotRevealed,
    AlreadyRated,
}

impl RatingBlocked {
    pub fn hint(self) -> &'static str {
        match self {
            Self::NotRevealed => "reveal the answer first ([r] or Enter)",
            Self::AlreadyRated => "card already rated; [n]ext or [p]revious to move on",
        }
    }
}

/// A card takes one judgment, and only once its answer is showing.
pub fn rating_gate(revealed: bool, current: CardRating) -> Result<(), RatingBlocked> {
    if !revealed {
        return Err(RatingBlocked::NotRevealed);
    }
    if current.is_rated() {
        return Err(RatingBlocked::AlreadyRated);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_letters_and_words() {
        assert_eq!(Action::parse("k"), Some(Action::Known));
        assert_eq!(Action::parse("  Unknown \n"), Some(Action::Unknown));
        assert_eq!(Action::parse("prev"), Some(Action::Previous));
        assert_eq!(Action::parse(""), Some(Action::Reveal));
        assert_eq!(Action::parse("x"), None);
    }

    #[test]
    fn rating_needs_an_unrated_revealed_card() {
        assert_eq!(
            rating_gate(false, CardRating::Unrated),
            Err(RatingBlocked::NotRevealed)
        );
        assert_eq!(
            rating_gate(false, CardRating::Known),
            Err(RatingBlocked::NotRevealed)
        );
        assert_eq!(
            rating_gate(true, CardRating::Unknown),
            Err(RatingBlocked::AlreadyRated)
        );
        assert_eq!(rating_gate(true, CardRating::Unrated), Ok(()));
    }
}
