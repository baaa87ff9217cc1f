//! Bounded undo/redo stacks.
//!
//! Both stacks push and pop at the top (LIFO) and evict at the bottom (FIFO)
//! once they exceed capacity. Backed by `im::Vector`, which gives O(1)
//! amortized operations at both ends.

use im::Vector;

use super::moves::Move;

/// Undo and redo stacks.
#[derive(Clone, Debug)]
pub struct MoveHistory {
    undo: Vector<Move>,
    redo: Vector<Move>,
    capacity: usize,
}

impl MoveHistory {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            undo: Vector::new(),
            redo: Vector::new(),
            capacity,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record a new forward move. Clears the redo stack.
    pub fn record(&mut self, mv: Move) {
        self.redo.clear();
        Self::push_bounded(&mut self.undo, mv, self.capacity);
    }

    /// Push onto the undo stack without touching redo (after a redo).
    pub fn push_undo(&mut self, mv: Move) {
        Self::push_bounded(&mut self.undo, mv, self.capacity);
    }

    /// Push onto the redo stack (after an undo).
    pub fn push_redo(&mut self, mv: Move) {
        Self::push_bounded(&mut self.redo, mv, self.capacity);
    }

    pub fn pop_undo(&mut self) -> Option<Move> {
        self.undo.pop_back()
    }

    pub fn pop_redo(&mut self) -> Option<Move> {
        self.redo.pop_back()
    }

    #[must_use]
    pub fn peek_undo(&self) -> Option<&Move> {
        self.undo.last()
    }

    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn push_bounded(stack: &mut Vector<Move>, mv: Move, capacity: usize) {
        stack.push_back(mv);
        while stack.len() > capacity {
            let evicted = stack.pop_front();
            tracing::trace!(
                target: "klondike.history",
                evicted = ?evicted.map(|m| m.source),
                "history full, evicted oldest",
            );
        }
    }
}

impl Default for MoveHistory {
    fn default() -> Self {
        Self::new(crate::core::MAX_HISTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, Suit};
    use crate::piles::PileId;

    fn mv(n: u8) -> Move {
        let card = CardId::from_parts(n % 13 + 1, Suit::Spades);
        Move::new(&[card], PileId::tableau(usize::from(n % 7)), PileId::tableau(0))
    }

    #[test]
    fn test_lifo() {
        let mut history = MoveHistory::new(10);
        history.record(mv(1));
        history.record(mv(2));

        assert_eq!(history.pop_undo(), Some(mv(2)));
        assert_eq!(history.pop_undo(), Some(mv(1)));
        assert_eq!(history.pop_undo(), None);
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = MoveHistory::new(10);
        history.record(mv(1));
        let undone = history.pop_undo().unwrap();
        history.push_redo(undone);
        assert!(history.can_redo());

        history.record(mv(2));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_undo_keeps_redo() {
        let mut history = MoveHistory::new(10);
        history.push_redo(mv(1));
        history.push_undo(mv(2));
        assert_eq!(history.redo_len(), 1);
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_overflow_evicts_oldest() {
        let mut history = MoveHistory::new(3);
        for n in 0..4 {
            history.record(mv(n));
        }

        assert_eq!(history.undo_len(), 3);
        assert_eq!(history.pop_undo(), Some(mv(3)));
        assert_eq!(history.pop_undo(), Some(mv(2)));
        assert_eq!(history.pop_undo(), Some(mv(1)));
        assert_eq!(history.pop_undo(), None);
    }

    #[test]
    fn test_default_capacity() {
        let mut history = MoveHistory::default();
        for n in 0..=1000u32 {
            history.record(mv((n % 200) as u8));
        }
        assert_eq!(history.undo_len(), 1000);
        assert_eq!(history.capacity(), 1000);
    }
}
