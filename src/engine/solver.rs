//! Greedy auto-win solver.
//!
//! Not a search: the solver only ever moves tableau tops to the foundations,
//! lowest value first, and gives up after a bounded number of passes. It is
//! offered once the layout is winnable (no face-down tableau cards, nothing
//! left in stock or talon), where that greedy order always completes.
//!
//! ## Stepping
//!
//! The solver is driven one move at a time. `step` returns
//! `SolverStep::Execute(mv)` and the caller runs the move to completion
//! before stepping again. On the next step the solver checks whether the
//! destination foundation grew by exactly one card; if so, the newly exposed
//! top of the source pile joins the queue.
//!
//! Each pass refills the queue with every tableau top. A pass that empties
//! the queue without finishing starts the next one, up to `max_attempts`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::history::Move;
use crate::piles::{PileId, Section, Table};
use crate::rules::next_foundation_move;

/// What the caller should do next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolverStep {
    /// Run this move, then step again once it has committed.
    Execute(Move),
    /// The solver has stopped.
    Done(SolverOutcome),
}

/// How a solver run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolverOutcome {
    /// All 52 cards reached the foundations.
    Completed,
    /// The pass bound ran out first. The layout is left as it is.
    Exhausted,
}

/// Queue entry. Ordered by value, then by enqueue order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    value: u8,
    order: u32,
    card: CardId,
}

#[derive(Clone, Copy, Debug)]
struct Awaiting {
    source: PileId,
    destination: PileId,
    destination_len: usize,
}

/// Greedy foundation-filling autopilot.
#[derive(Clone, Debug)]
pub struct AutoWinSolver {
    max_attempts: u32,
    attempts: u32,
    queue: BinaryHeap<Reverse<Candidate>>,
    next_order: u32,
    awaiting: Option<Awaiting>,
}

impl AutoWinSolver {
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            attempts: 0,
            queue: BinaryHeap::new(),
            next_order: 0,
            awaiting: None,
        }
    }

    /// Passes started so far.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Pick the next foundation move, or stop.
    pub fn step(&mut self, table: &Table) -> SolverStep {
        if let Some(awaiting) = self.awaiting.take() {
            let grown = table.pile(awaiting.destination).len() == awaiting.destination_len + 1;
            if grown {
                if let Some(next) = table.pile(awaiting.source).top() {
                    self.enqueue(next);
                }
            }
        }

        loop {
            if table.is_won() {
                tracing::info!(
                    target: "klondike.solver",
                    attempts = self.attempts,
                    "auto-win completed",
                );
                return SolverStep::Done(SolverOutcome::Completed);
            }

            let Some(Reverse(candidate)) = self.queue.pop() else {
                if self.attempts >= self.max_attempts {
                    tracing::info!(
                        target: "klondike.solver",
                        attempts = self.attempts,
                        "auto-win gave up",
                    );
                    return SolverStep::Done(SolverOutcome::Exhausted);
                }
                self.attempts += 1;
                self.refill(table);
                continue;
            };

            let Some(source) = Self::movable_from(table, candidate.card) else {
                continue;
            };
            let Some(destination) = next_foundation_move(table, candidate.card) else {
                continue;
            };

            tracing::debug!(
                target: "klondike.solver",
                card = %candidate.card,
                %source,
                %destination,
                attempt = self.attempts,
            );
            self.awaiting = Some(Awaiting {
                source,
                destination,
                destination_len: table.pile(destination).len(),
            });
            return SolverStep::Execute(Move::new(&[candidate.card], source, destination));
        }
    }

    /// Queue every tableau top.
    fn refill(&mut self, table: &Table) {
        for pile in PileId::tableaus() {
            if let Some(top) = table.pile(pile).top() {
                self.enqueue(top);
            }
        }
        tracing::trace!(
            target: "klondike.solver",
            attempt = self.attempts,
            queued = self.queue.len(),
            "pass started",
        );
    }

    fn enqueue(&mut self, card: CardId) {
        self.queue.push(Reverse(Candidate {
            value: card.value(),
            order: self.next_order,
            card,
        }));
        self.next_order = self.next_order.wrapping_add(1);
    }

    /// The card's pile, if it is still a face-up tableau top.
    fn movable_from(table: &Table, card: CardId) -> Option<PileId> {
        let pile = table.pile_of(card)?;
        let is_top = table.pile(pile).top() == Some(card);
        let ok = pile.section() == Section::Tableau && is_top && table.card(card).is_face_up();
        ok.then_some(pile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Face, Suit};
    use crate::piles::FOUNDATION_COUNT;

    /// Four columns, each a full suit with the king at the bottom.
    fn sorted_runs() -> Table {
        let runs: Vec<Vec<(CardId, Face)>> = Suit::ALL
            .iter()
            .map(|&suit| {
                (1..=13)
                    .rev()
                    .map(|v| (CardId::from_parts(v, suit), Face::Up))
                    .collect()
            })
            .collect();
        let layout: Vec<(PileId, &[(CardId, Face)])> = runs
            .iter()
            .enumerate()
            .map(|(i, run)| (PileId::tableau(i), run.as_slice()))
            .collect();
        Table::arranged(&layout)
    }

    /// Apply moves directly, as an instant executor would.
    fn drive(solver: &mut AutoWinSolver, table: &mut Table) -> (SolverOutcome, usize) {
        let mut moves = 0;
        loop {
            match solver.step(table) {
                SolverStep::Execute(mv) => {
                    let cards = table.detach_top(mv.source, 1);
                    table.attach(mv.destination, &cards);
                    moves += 1;
                }
                SolverStep::Done(outcome) => return (outcome, moves),
            }
        }
    }

    #[test]
    fn test_sorted_runs_complete_in_one_pass() {
        let mut table = sorted_runs();
        let mut solver = AutoWinSolver::new(5000);

        let (outcome, moves) = drive(&mut solver, &mut table);
        assert_eq!(outcome, SolverOutcome::Completed);
        assert_eq!(moves, 52);
        assert_eq!(solver.attempts(), 1);
        assert!(table.is_won());
        for i in 0..FOUNDATION_COUNT {
            assert_eq!(table.pile(PileId::foundation(i)).len(), 13);
        }
    }

    #[test]
    fn test_lowest_value_first() {
        let mut table = sorted_runs();
        let mut solver = AutoWinSolver::new(10);

        let SolverStep::Execute(first) = solver.step(&table) else {
            panic!("expected a move");
        };
        assert_eq!(first.pivot().map(CardId::value), Some(1));
        assert_eq!(first.pivot().map(CardId::suit), Some(Suit::Hearts), "ties keep enqueue order");

        let cards = table.detach_top(first.source, 1);
        table.attach(first.destination, &cards);

        let SolverStep::Execute(second) = solver.step(&table) else {
            panic!("expected a move");
        };
        assert_eq!(second.pivot().map(CardId::value), Some(1));
        assert_eq!(second.pivot().map(CardId::suit), Some(Suit::Diamonds));
    }

    #[test]
    fn test_stuck_layout_exhausts() {
        // A lone two with no ace anywhere reachable.
        let column = [(CardId::from_parts(2, Suit::Clubs), Face::Up)];
        let mut table = Table::arranged(&[(PileId::tableau(0), &column)]);
        let mut solver = AutoWinSolver::new(7);

        let (outcome, moves) = drive(&mut solver, &mut table);
        assert_eq!(outcome, SolverOutcome::Exhausted);
        assert_eq!(moves, 0);
        assert_eq!(solver.attempts(), 7);
    }

    #[test]
    fn test_face_down_tops_are_skipped() {
        let column = [(CardId::from_parts(1, Suit::Spades), Face::Down)];
        let mut table = Table::arranged(&[(PileId::tableau(0), &column)]);
        let mut solver = AutoWinSolver::new(3);

        let (outcome, _) = drive(&mut solver, &mut table);
        assert_eq!(outcome, SolverOutcome::Exhausted);
    }
}
