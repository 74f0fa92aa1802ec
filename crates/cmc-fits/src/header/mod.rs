//! FITS header handling.
//!
//! - [`card`]: 80-byte card encoding and parsing
//! - [`block`]: 2880-byte block layout for headers and data
//! - [`Header`]: ordered card collection with typed lookups

pub mod block;
pub mod card;

pub use block::{BLOCK_LEN, CARDS_PER_BLOCK, align_to_block, build_header_block, parse_header_block};
pub use card::{
    CARD_LEN, Card, CardValue, KEYWORD_LEN, build_card, is_commentary_keyword, parse_card,
    validate_keyword,
};

/// Ordered collection of header cards, excluding the `END` card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    cards: Vec<Card>,
}

impl Header {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a card, keeping any existing card with the same keyword.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Set a value card, replacing the first card with the same keyword.
    pub fn set(&mut self, keyword: &str, value: impl Into<CardValue>) {
        let value = value.into();
        let existing = self.cards.iter_mut().find_map(|card| match card {
            Card::Value {
                keyword: k,
                value: v,
                ..
            } if k == keyword => Some(v),
            _ => None,
        });
        match existing {
            Some(slot) => *slot = value,
            None => self.cards.push(Card::value(keyword, value)),
        }
    }

    /// Remove every value card with the given keyword.
    pub fn remove(&mut self, keyword: &str) {
        self.cards
            .retain(|card| !matches!(card, Card::Value { keyword: k, .. } if k == keyword));
    }

    /// Value of the first card with the given keyword.
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&CardValue> {
        self.cards.iter().find_map(|card| match card {
            Card::Value { keyword: k, value, .. } if k == keyword => Some(value),
            _ => None,
        })
    }

    #[must_use]
    pub fn get_i64(&self, keyword: &str) -> Option<i64> {
        self.get(keyword).and_then(CardValue::as_i64)
    }

    #[must_use]
    pub fn get_f64(&self, keyword: &str) -> Option<f64> {
        self.get(keyword).and_then(CardValue::as_f64)
    }

    #[must_use]
    pub fn get_str(&self, keyword: &str) -> Option<&str> {
        self.get(keyword).and_then(CardValue::as_str)
    }

    #[must_use]
    pub fn get_bool(&self, keyword: &str) -> Option<bool> {
        self.get(keyword).and_then(CardValue::as_bool)
    }

    /// Text of all `COMMENT` cards, in order.
    pub fn comments(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().filter_map(|card| match card {
            Card::Commentary { keyword, text } if keyword == "COMMENT" => Some(text.as_str()),
            _ => None,
        })
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Keep only cards for which `keep` returns true.
    pub(crate) fn retain(&mut self, keep: impl FnMut(&Card) -> bool) {
        self.cards.retain(keep);
    }
}

impl FromIterator<Card> for Header {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_existing() {
        let mut header = Header::new();
        header.set("NOBJ", 10_i64);
        header.set("NOBJ", 12_i64);
        assert_eq!(header.len(), 1);
        assert_eq!(header.get_i64("NOBJ"), Some(12));
    }

    #[test]
    fn test_typed_lookups() {
        let mut header = Header::new();
        header.set("EXTNAME", "CLUS_OBJ_DATA");
        header.set("NBINARY", 3_i64);
        header.set("Z", 0.02);
        header.set("EXTEND", true);
        header.push(Card::comment("first"));
        header.push(Card::comment("second"));

        assert_eq!(header.get_str("EXTNAME"), Some("CLUS_OBJ_DATA"));
        assert_eq!(header.get_f64("NBINARY"), Some(3.0));
        assert_eq!(header.get_i64("Z"), None);
        assert_eq!(header.get_bool("EXTEND"), Some(true));
        assert_eq!(header.comments().collect::<Vec<_>>(), vec!["first", "second"]);
    }

    #[test]
    fn test_remove() {
        let mut header: Header = [Card::value("A", 1_i64), Card::value("B", 2_i64)]
            .into_iter()
            .collect();
        header.remove("A");
        assert!(header.get("A").is_none());
        assert_eq!(header.len(), 1);
    }
}
