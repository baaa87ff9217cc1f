//! Cards: identity, facing and the deck.
//!
//! - `CardId`: compact (value, suit) identity, `0..52`
//! - `Card`: an id plus its facing and owning pile
//! - `Deck`: a shuffled draw order for dealing

pub mod card;
pub mod deck;

pub use card::{Card, CardId, Color, Face, Suit, DECK_SIZE, VALUES_PER_SUIT};
pub use deck::Deck;
