//! Placement rules.
//!
//! `MoveValidator` is a set of pure predicates. Given the pivot card of a
//! selection (the bottom-most card being moved), how many cards move with it,
//! and the destination pile, it decides whether the drop is legal. It never
//! touches the table.
//!
//! ## Rules
//!
//! - Foundation: empty accepts an Ace; otherwise the next value of the same
//!   suit. Never more than one card at a time.
//! - Tableau: empty accepts a King; otherwise a face-up top card one value
//!   higher and of the opposite color.
//! - Stock and Talon never accept a drop. Cards only reach them through
//!   drawing and recycling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::{Card, CardId};
use crate::piles::{PileId, Section, Table};

/// A placement rule that rejected a drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Rejection {
    #[error("only one card at a time may go to a foundation")]
    MultipleToFoundation,

    #[error("an empty foundation only accepts an ace")]
    FoundationNeedsAce,

    #[error("foundation needs the next card of the same suit")]
    FoundationSequence,

    #[error("an empty tableau pile only accepts a king")]
    TableauNeedsKing,

    #[error("cannot build on a face-down card")]
    TableauCoveredTop,

    #[error("tableau needs the next lower card of the opposite color")]
    TableauSequence,

    #[error("{0:?} is not a drop target")]
    NotADropTarget(Section),
}

/// Stateless placement rules.
pub struct MoveValidator;

impl MoveValidator {
    /// Foundation rule for a single card against the destination's top card.
    pub fn foundation_accepts(card: CardId, top: Option<&Card>) -> Result<(), Rejection> {
        match top {
            None if card.value() == 1 => Ok(()),
            None => Err(Rejection::FoundationNeedsAce),
            Some(top) if top.value() + 1 == card.value() && top.suit() == card.suit() => Ok(()),
            Some(_) => Err(Rejection::FoundationSequence),
        }
    }

    /// Tableau rule for a pivot card against the destination's top card.
    pub fn tableau_accepts(card: CardId, top: Option<&Card>) -> Result<(), Rejection> {
        match top {
            None if card.value() == 13 => Ok(()),
            None => Err(Rejection::TableauNeedsKing),
            Some(top) if !top.is_face_up() => Err(Rejection::TableauCoveredTop),
            Some(top)
                if top.value() == card.value() + 1
                    && top.suit().is_opposite_color(card.suit()) =>
            {
                Ok(())
            }
            Some(_) => Err(Rejection::TableauSequence),
        }
    }

    /// Full rule check for dropping `count` cards pivoted on `card` onto
    /// `dest`.
    pub fn check(table: &Table, card: CardId, count: usize, dest: PileId) -> Result<(), Rejection> {
        let top = table.top(dest);
        match dest.section() {
            Section::Foundation => {
                if count > 1 {
                    return Err(Rejection::MultipleToFoundation);
                }
                Self::foundation_accepts(card, top)
            }
            Section::Tableau => Self::tableau_accepts(card, top),
            section @ (Section::Stock | Section::Talon) => {
                Err(Rejection::NotADropTarget(section))
            }
        }
    }

    /// Convenience wrapper returning a plain bool.
    #[must_use]
    pub fn is_legal(table: &Table, card: CardId, count: usize, dest: PileId) -> bool {
        Self::check(table, card, count, dest).is_ok()
    }
}
