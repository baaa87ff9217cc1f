//! Piles: ordered card containers with section semantics.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// Number of foundation piles.
pub const FOUNDATION_COUNT: usize = 4;

/// Number of tableau piles.
pub const TABLEAU_COUNT: usize = 7;

/// Total piles on the table: 4 foundations, 7 tableau, stock, talon.
pub const PILE_COUNT: usize = FOUNDATION_COUNT + TABLEAU_COUNT + 2;

/// Table section a pile belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Tableau,
    Foundation,
    Stock,
    Talon,
}

/// Pile identifier.
///
/// The table layout is fixed, so ids are fixed too:
/// - `0..4`: foundations
/// - `4..11`: tableau columns, left to right
/// - `11`: stock
/// - `12`: talon
///
/// Enumeration order (`PileId::all`) is this id order; the next-available
/// move query relies on it for tie-breaking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PileId(pub u8);

impl PileId {
    pub const STOCK: PileId = PileId((FOUNDATION_COUNT + TABLEAU_COUNT) as u8);
    pub const TALON: PileId = PileId((FOUNDATION_COUNT + TABLEAU_COUNT + 1) as u8);

    /// The `index`-th foundation (0..4).
    #[must_use]
    pub const fn foundation(index: usize) -> Self {
        assert!(index < FOUNDATION_COUNT, "foundation index out of range");
        Self(index as u8)
    }

    /// The `index`-th tableau column (0..7).
    #[must_use]
    pub const fn tableau(index: usize) -> Self {
        assert!(index < TABLEAU_COUNT, "tableau index out of range");
        Self((FOUNDATION_COUNT + index) as u8)
    }

    /// Section this id belongs to.
    #[must_use]
    pub const fn section(self) -> Section {
        let raw = self.0 as usize;
        if raw < FOUNDATION_COUNT {
            Section::Foundation
        } else if raw < FOUNDATION_COUNT + TABLEAU_COUNT {
            Section::Tableau
        } else if raw == FOUNDATION_COUNT + TABLEAU_COUNT {
            Section::Stock
        } else {
            Section::Talon
        }
    }

    /// Position within the section (column index for tableau/foundation).
    #[must_use]
    pub const fn index_in_section(self) -> usize {
        match self.section() {
            Section::Foundation => self.0 as usize,
            Section::Tableau => self.0 as usize - FOUNDATION_COUNT,
            Section::Stock | Section::Talon => 0,
        }
    }

    /// Index into pile storage.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether the id names one of the table's piles.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        (self.0 as usize) < PILE_COUNT
    }

    /// Every pile id, in enumeration order.
    pub fn all() -> impl Iterator<Item = PileId> {
        (0..PILE_COUNT as u8).map(PileId)
    }

    /// Foundation ids in scan order.
    pub fn foundations() -> impl Iterator<Item = PileId> {
        (0..FOUNDATION_COUNT).map(PileId::foundation)
    }

    /// Tableau ids in scan order.
    pub fn tableaus() -> impl Iterator<Item = PileId> {
        (0..TABLEAU_COUNT).map(PileId::tableau)
    }
}

impl std::fmt::Display for PileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.section() {
            Section::Foundation => write!(f, "Foundation({})", self.index_in_section()),
            Section::Tableau => write!(f, "Tableau({})", self.index_in_section()),
            Section::Stock => write!(f, "Stock"),
            Section::Talon => write!(f, "Talon"),
        }
    }
}

/// An ordered stack of cards.
///
/// `cards` runs bottom to top; insertion order is stack order.
///
/// `waiting` is set while an in-flight move targets or leaves this pile. A
/// waiting pile never re-derives the facing of its top card, which keeps the
/// reveal logic from flipping a card that is about to be covered again.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pile {
    pub id: PileId,
    cards: Vec<CardId>,
    pub waiting: bool,
}

impl Pile {
    #[must_use]
    pub fn new(id: PileId) -> Self {
        Self {
            id,
            cards: Vec::new(),
            waiting: false,
        }
    }

    #[must_use]
    pub fn section(&self) -> Section {
        self.id.section()
    }

    /// Cards bottom to top.
    #[must_use]
    pub fn cards(&self) -> &[CardId] {
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

    /// Top card (last in the vec).
    #[must_use]
    pub fn top(&self) -> Option<CardId> {
        self.cards.last().copied()
    }

    /// Position of a card in this pile (0 = bottom).
    #[must_use]
    pub fn position_of(&self, card: CardId) -> Option<usize> {
        self.cards.iter().position(|&c| c == card)
    }

    /// The card at `index` and every card above it.
    #[must_use]
    pub fn run_from(&self, index: usize) -> &[CardId] {
        self.cards.get(index..).unwrap_or(&[])
    }

    /// Only the top card of a tableau pile accepts new cards on it.
    #[must_use]
    pub fn is_stackable(&self, card: CardId) -> bool {
        self.section() == Section::Tableau && self.top() == Some(card)
    }

    pub(crate) fn push(&mut self, card: CardId) {
        self.cards.push(card);
    }

    pub(crate) fn pop(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    /// Split off the top `count` cards, preserving their relative order.
    pub(crate) fn split_top(&mut self, count: usize) -> Vec<CardId> {
        let at = self.cards.len().saturating_sub(count);
        self.cards.split_off(at)
    }

    pub(crate) fn clear(&mut self) -> Vec<CardId> {
        self.waiting = false;
        std::mem::take(&mut self.cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    #[test]
    fn test_pile_id_sections() {
        for i in 0..FOUNDATION_COUNT {
            assert_eq!(PileId::foundation(i).section(), Section::Foundation);
            assert_eq!(PileId::foundation(i).index_in_section(), i);
        }
        for i in 0..TABLEAU_COUNT {
            assert_eq!(PileId::tableau(i).section(), Section::Tableau);
            assert_eq!(PileId::tableau(i).index_in_section(), i);
        }
        assert_eq!(PileId::STOCK.section(), Section::Stock);
        assert_eq!(PileId::TALON.section(), Section::Talon);
        assert_eq!(PileId::all().count(), PILE_COUNT);
        assert!(PileId::all().all(PileId::is_valid));
        assert!(!PileId(PILE_COUNT as u8).is_valid());
    }

    #[test]
    fn test_split_top_preserves_order() {
        let mut pile = Pile::new(PileId::tableau(0));
        let ids: Vec<_> = (1..=5).map(|v| CardId::from_parts(v, Suit::Clubs)).collect();
        for &id in &ids {
            pile.push(id);
        }

        let top = pile.split_top(3);

        assert_eq!(top, &ids[2..]);
        assert_eq!(pile.cards(), &ids[..2]);
    }

    #[test]
    fn test_stackable_only_on_tableau_top() {
        let mut tableau = Pile::new(PileId::tableau(3));
        let a = CardId::from_parts(9, Suit::Hearts);
        let b = CardId::from_parts(8, Suit::Spades);
        tableau.push(a);
        tableau.push(b);

        assert!(!tableau.is_stackable(a));
        assert!(tableau.is_stackable(b));

        let mut foundation = Pile::new(PileId::foundation(0));
        foundation.push(a);
        assert!(!foundation.is_stackable(a));
    }

    #[test]
    fn test_run_from() {
        let mut pile = Pile::new(PileId::tableau(1));
        let ids: Vec<_> = (1..=4).map(|v| CardId::from_parts(v, Suit::Spades)).collect();
        for &id in &ids {
            pile.push(id);
        }

        assert_eq!(pile.run_from(1), &ids[1..]);
        assert!(pile.run_from(9).is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(PileId::tableau(6).to_string(), "Tableau(6)");
        assert_eq!(PileId::foundation(0).to_string(), "Foundation(0)");
        assert_eq!(PileId::STOCK.to_string(), "Stock");
    }
}
