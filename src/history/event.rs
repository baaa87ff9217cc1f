//! Reversible primitive side effects.
//!
//! An `Event` is something a move caused beyond relocating its own cards:
//! revealing a tableau card, or recycling the talon. Events are recorded on
//! the `Move` that caused them so undo can take them back.
//!
//! ## Reversal
//!
//! Reversal is a toggle, not a re-derivation:
//! - `Flip` reverses to itself (flipping the same card again)
//! - `Replenish` and `Deplenish` swap into each other

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::piles::{PileId, Table};

/// Kind of side effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Flip,
    Replenish,
    Deplenish,
    None,
}

impl EventKind {
    /// The kind that undoes this one.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            EventKind::Replenish => EventKind::Deplenish,
            EventKind::Deplenish => EventKind::Replenish,
            other => other,
        }
    }
}

/// A recorded side effect.
///
/// `pile` is the pile whose `waiting` flag is held while the event's visual
/// effect plays: the pile the flipped card sits on, or the stock for a
/// recycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub card: Option<CardId>,
    pub pile: PileId,
}

impl Event {
    /// Flip `card`, which sits on `pile`.
    #[must_use]
    pub const fn flip(card: CardId, pile: PileId) -> Self {
        Self {
            kind: EventKind::Flip,
            card: Some(card),
            pile,
        }
    }

    /// Recycle the talon into the stock.
    #[must_use]
    pub const fn replenish() -> Self {
        Self {
            kind: EventKind::Replenish,
            card: None,
            pile: PileId::STOCK,
        }
    }

    /// Swap this event into its reverse in place.
    pub fn reverse(&mut self) {
        self.kind = self.kind.reversed();
    }

    /// Perform the event on the table.
    ///
    /// Returns the cards whose pile or facing changed.
    pub fn apply(&self, table: &mut Table) -> Vec<CardId> {
        match self.kind {
            EventKind::Flip => match self.card {
                Some(card) => {
                    table.flip(card);
                    vec![card]
                }
                None => Vec::new(),
            },
            EventKind::Replenish => table.replenish(),
            EventKind::Deplenish => table.deplenish(),
            EventKind::None => Vec::new(),
        }
    }
}
