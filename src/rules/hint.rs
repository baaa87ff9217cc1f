//! Next-available-move query.
//!
//! Used by double-click moves and by the auto-win solver. Foundations are
//! always preferred for a single card. Among tableau piles the nearest legal
//! landing slot wins, with ties going to the first pile in enumeration
//! order.

use crate::cards::CardId;
use crate::core::{Layout, Position};
use crate::piles::{PileId, Table};

use super::validator::MoveValidator;

/// First foundation (in scan order) that legally accepts `card` alone.
#[must_use]
pub fn next_foundation_move(table: &Table, card: CardId) -> Option<PileId> {
    let current = table.pile_of(card);
    PileId::foundations()
        .filter(|&pile| Some(pile) != current)
        .find(|&pile| MoveValidator::is_legal(table, card, 1, pile))
}

/// Best destination for `card` moving together with `count - 1` cards above
/// it, or `None` if nothing is legal.
///
/// `from` is the card's current position; tableau candidates are ranked by
/// squared distance from it to the slot the card would land in.
#[must_use]
pub fn next_available_move(
    table: &Table,
    layout: &Layout,
    card: CardId,
    count: usize,
    from: Position,
) -> Option<PileId> {
    if count == 1 {
        if let Some(pile) = next_foundation_move(table, card) {
            return Some(pile);
        }
    }

    let current = table.pile_of(card);
    let mut best: Option<(PileId, f32)> = None;
    for pile in PileId::tableaus() {
        if Some(pile) == current || !MoveValidator::is_legal(table, card, count, pile) {
            continue;
        }
        let landing = layout.slot(pile, table.pile(pile).len());
        let distance = from.distance_sq(&landing);
        // Strict less-than keeps the first pile on ties.
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((pile, distance));
        }
    }
    best.map(|(pile, _)| pile)
}
