use crate::model::ids::CardId;

/// A question/answer pair. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    id: CardId,
    front: String,
    back: String,
    tag: Option<String>,
}

impl Card {
    #[must_use]
    pub fn new(
        id: CardId,
        front: impl Into<String>,
        back: impl Into<String>,
        tag: Option<String>,
    ) -> Self {
        Self {
            id,
            front: front.into(),
            back: back.into(),
            tag: tag.filter(|t| !t.trim().is_empty()),
        }
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn front(&self) -> &str {
        &self.front
    }

    #[must_use]
    pub fn back(&self) -> &str {
        &self.back
    }

    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tag_is_dropped() {
        let card = Card::new(CardId::new(1), "Q", "A", Some("  ".into()));
        assert_eq!(card.tag(), None);

        let tagged = Card::new(CardId::new(2), "Q", "A", Some("verbs".into()));
        assert_eq!(tagged.tag(), Some("verbs"));
    }
}
