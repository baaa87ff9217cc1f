//! Card identity and facing.
//!
//! A `Card` is a value object: a fixed (value, suit) identity plus the two
//! pieces of mutable state the engine tracks for it, its `Face` and the pile
//! that currently holds it.
//!
//! ## Identity Layout
//!
//! `CardId` packs the identity into a single byte:
//! `suit.index() * 13 + (value - 1)`. The 52 ids `0..52` therefore map
//! one-to-one onto (value, suit) pairs, and the engine indexes card storage
//! directly by id.
//!
//! ```
//! use klondike_engine::cards::{CardId, Suit};
//!
//! let ace_of_spades = CardId::from_parts(1, Suit::Spades);
//! assert_eq!(ace_of_spades.value(), 1);
//! assert_eq!(ace_of_spades.suit(), Suit::Spades);
//! ```

use serde::{Deserialize, Serialize};

use crate::piles::PileId;

/// Number of distinct values per suit (Ace..King).
pub const VALUES_PER_SUIT: u8 = 13;

/// Total cards in a deck.
pub const DECK_SIZE: usize = 52;

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    /// All suits in id order.
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// Position of this suit in `Suit::ALL`.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Suit::Hearts => 0,
            Suit::Diamonds => 1,
            Suit::Clubs => 2,
            Suit::Spades => 3,
        }
    }

    /// Color of the suit.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }

    /// True when the two suits have different colors.
    #[must_use]
    pub const fn is_opposite_color(self, other: Suit) -> bool {
        !matches!(
            (self.color(), other.color()),
            (Color::Red, Color::Red) | (Color::Black, Color::Black)
        )
    }
}

/// Suit color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

/// Card facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    Up,
    Down,
}

impl Face {
    /// The opposite facing.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Face::Up => Face::Down,
            Face::Down => Face::Up,
        }
    }
}

/// Compact card identity, `0..52`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u8);

impl CardId {
    /// Build an id from value (1..=13) and suit.
    ///
    /// Panics on a value outside `1..=13`; ids are only built from known-good
    /// literals and deck enumeration.
    #[must_use]
    pub const fn from_parts(value: u8, suit: Suit) -> Self {
        assert!(value >= 1 && value <= VALUES_PER_SUIT, "card value out of range");
        Self(suit.index() * VALUES_PER_SUIT + (value - 1))
    }

    /// Card value, 1 (Ace) through 13 (King).
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0 % VALUES_PER_SUIT + 1
    }

    /// Card suit.
    #[must_use]
    pub const fn suit(self) -> Suit {
        Suit::ALL[(self.0 / VALUES_PER_SUIT) as usize]
    }

    /// Index into card storage.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether the id names a card of the deck.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        (self.0 as usize) < DECK_SIZE
    }

    /// Iterate every id in a deck, suit-major.
    pub fn all() -> impl Iterator<Item = CardId> {
        (0..DECK_SIZE as u8).map(CardId)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rank = match self.value() {
            1 => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            v => v.to_string(),
        };
        let suit = match self.suit() {
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
            Suit::Spades => 's',
        };
        write!(f, "{rank}{suit}")
    }
}

/// A card on the table.
///
/// `pile` is a weak back-reference: the owning `Pile` holds the card's id in
/// its ordered list, the card only remembers which pile that is. It is `None`
/// while the card is detached and in flight between piles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub face: Face,
    pub pile: Option<PileId>,
}

impl Card {
    /// A face-down card not yet placed on any pile.
    #[must_use]
    pub const fn new(id: CardId) -> Self {
        Self {
            id,
            face: Face::Down,
            pile: None,
        }
    }

    #[must_use]
    pub const fn value(&self) -> u8 {
        self.id.value()
    }

    #[must_use]
    pub const fn suit(&self) -> Suit {
        self.id.suit()
    }

    #[must_use]
    pub fn is_face_up(&self) -> bool {
        self.face == Face::Up
    }

    /// Toggle the facing.
    pub fn flip(&mut self) {
        self.face = self.face.flipped();
    }
}
