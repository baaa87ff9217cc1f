//! Composite, reversible user actions.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardId;
use crate::piles::PileId;

use super::event::Event;

/// A move: cards relocated from one pile to another, plus the side effects
/// that followed.
///
/// `cards` is in pile order, bottom to top; the first card is the pivot the
/// player picked up. A special move (recycling the talon) has no cards; all
/// of its effect lives in its single event, and `source`/`destination` name
/// the talon and stock for bookkeeping only.
///
/// ## Invariants
///
/// - A non-special move has at least one card
/// - A special move has exactly one event, of kind Replenish or Deplenish
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub cards: SmallVec<[CardId; 4]>,
    pub source: PileId,
    pub destination: PileId,
    pub events: SmallVec<[Event; 2]>,
    pub special: bool,
}

impl Move {
    /// A card move. Panics on an empty card list.
    #[must_use]
    pub fn new(cards: &[CardId], source: PileId, destination: PileId) -> Self {
        assert!(!cards.is_empty(), "a card move needs at least one card");
        Self {
            cards: SmallVec::from_slice(cards),
            source,
            destination,
            events: SmallVec::new(),
            special: false,
        }
    }

    /// A talon recycle.
    #[must_use]
    pub fn recycle() -> Self {
        let mut events = SmallVec::new();
        events.push(Event::replenish());
        Self {
            cards: SmallVec::new(),
            source: PileId::TALON,
            destination: PileId::STOCK,
            events,
            special: true,
        }
    }

    /// The card the player picked up.
    #[must_use]
    pub fn pivot(&self) -> Option<CardId> {
        self.cards.first().copied()
    }

    /// Number of cards moved.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Record a side effect that followed the move.
    pub fn push_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// The single event of a special move.
    pub fn special_event_mut(&mut self) -> Option<&mut Event> {
        if self.special {
            self.events.first_mut()
        } else {
            None
        }
    }
}
