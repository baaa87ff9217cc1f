//! Win and winnable-state detection.
//!
//! ## Won
//!
//! All 52 cards on the foundations.
//!
//! ## Winnable
//!
//! A heuristic that drives the auto-win affordance. It is entered only when
//! no tableau card is face-down and tableau+foundation hold all 52 cards.
//! Once entered it is held while:
//! - no tableau card is face-down,
//! - tableau+foundation hold at least `52 - slack` cards, and
//! - stock and talon are empty.
//!
//! The slack absorbs cards that are briefly out of both sections (picked up
//! and in flight), so the indicator does not flicker during a drag. The
//! combined count does not include the talon.

use crate::cards::DECK_SIZE;
use crate::piles::{Census, Table};

/// All 52 cards are on the foundations.
#[must_use]
pub fn is_won(table: &Table) -> bool {
    table.is_won()
}

/// Winnable indicator with hysteresis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WinTracker {
    slack: usize,
    winnable: bool,
}

impl WinTracker {
    #[must_use]
    pub fn new(slack: usize) -> Self {
        Self {
            slack,
            winnable: false,
        }
    }

    /// Current indicator value.
    #[must_use]
    pub fn is_winnable(&self) -> bool {
        self.winnable
    }

    /// Feed the latest census; returns the updated indicator.
    pub fn observe(&mut self, census: &Census) -> bool {
        let no_hidden = census.tableau_face_down == 0;
        self.winnable = if self.winnable {
            no_hidden
                && census.combined() >= DECK_SIZE.saturating_sub(self.slack)
                && census.stock == 0
                && census.talon == 0
        } else {
            no_hidden && census.combined() == DECK_SIZE
        };
        self.winnable
    }

    /// Drop back to not-winnable, e.g. on a new deal.
    pub fn reset(&mut self) {
        self.winnable = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn census(tableau: usize, foundation: usize, face_down: usize) -> Census {
        Census {
            tableau_face_down: face_down,
            tableau,
            foundation,
            stock: 0,
            talon: 0,
        }
    }

    #[test]
    fn test_enters_only_at_full_count() {
        let mut tracker = WinTracker::new(13);
        assert!(!tracker.observe(&census(40, 11, 0)));
        assert!(!tracker.observe(&census(41, 11, 1)));
        assert!(tracker.observe(&census(41, 11, 0)));
    }

    #[test]
    fn test_hysteresis_holds_through_thirteen_removed() {
        let mut tracker = WinTracker::new(13);
        assert!(tracker.observe(&census(40, 12, 0)));

        for removed in 1..=13 {
            assert!(
                tracker.observe(&census(40 - removed, 12, 0)),
                "still winnable with {removed} cards out"
            );
        }

        assert!(!tracker.observe(&census(26, 12, 0)), "fourteenth card clears it");
        // Coming back to 39 is not enough to re-enter.
        assert!(!tracker.observe(&census(27, 12, 0)));
        assert!(tracker.observe(&census(40, 12, 0)));
    }

    #[test]
    fn test_face_down_clears() {
        let mut tracker = WinTracker::new(13);
        assert!(tracker.observe(&census(52, 0, 0)));
        assert!(!tracker.observe(&census(52, 0, 1)));
    }

    #[test]
    fn test_stock_clears_while_held() {
        let mut tracker = WinTracker::new(13);
        assert!(tracker.observe(&census(52, 0, 0)));
        let mut with_stock = census(51, 0, 0);
        with_stock.stock = 1;
        assert!(!tracker.observe(&with_stock));
    }

    #[test]
    fn test_reset() {
        let mut tracker = WinTracker::new(13);
        tracker.observe(&census(52, 0, 0));
        tracker.reset();
        assert!(!tracker.is_winnable());
    }
}
