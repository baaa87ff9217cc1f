//! Deck construction and shuffling.

use crate::core::DealRng;

use super::card::{CardId, DECK_SIZE};

/// A full 52-card deck in draw order.
///
/// Index 0 is dealt first. Every (value, suit) pair appears exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    order: Vec<CardId>,
}

impl Deck {
    /// A deck in id order (suit-major, Ace first).
    #[must_use]
    pub fn ordered() -> Self {
        Self {
            order: CardId::all().collect(),
        }
    }

    /// A freshly shuffled deck.
    #[must_use]
    pub fn shuffled(rng: &mut DealRng) -> Self {
        let mut deck = Self::ordered();
        rng.shuffle(&mut deck.order);
        deck
    }

    /// Cards in draw order.
    #[must_use]
    pub fn cards(&self) -> &[CardId] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::ordered()
    }
}

impl IntoIterator for Deck {
    type Item = CardId;
    type IntoIter = std::vec::IntoIter<CardId>;

    fn into_iter(self) -> Self::IntoIter {
        debug_assert_eq!(self.order.len(), DECK_SIZE);
        self.order.into_iter()
    }
}
