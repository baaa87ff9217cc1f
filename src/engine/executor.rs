//! Move execution.
//!
//! The executor applies and reverses moves against the table, one at a
//! time, across ticks. Each in-flight move walks:
//!
//! ```text
//! REQUESTED ─▶ VALIDATED ─▶ [REVERSING] ─▶ APPLYING ─▶ SETTLING ─▶ COMMITTED
//!     │            │
//!     └────────────┴─▶ REJECTED
//! ```
//!
//! - **REQUESTED/VALIDATED**: `prepare` checks the selection and the rules.
//!   Nothing is mutated on rejection.
//! - **REVERSING** (undo only): recorded events are reversed in order; the
//!   move waits until every reversed flip has finished.
//! - **APPLYING**: cards are detached from their pile in order and handed
//!   to the gate to travel to their landing slots.
//! - **SETTLING**: once every card has arrived they are reattached to the
//!   destination in their original relative order, both piles stop
//!   waiting, and events are replayed (redo) or derived (a reveal flip on
//!   the source pile). The move waits for those flips.
//! - **COMMITTED**: `step` hands the finished move back to the caller.
//!
//! Special moves (talon recycling) have no geometry: their single event is
//! applied immediately and the move commits on the next step.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{CardId, Face};
use crate::core::{InvalidMove, Layout, MoveError};
use crate::history::{Event, EventKind, Move};
use crate::piles::{PileId, Section, Table};
use crate::rules::MoveValidator;
use crate::transition::{Cue, TransitionGate};

/// Phase of a move's lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovePhase {
    Requested,
    Validated,
    Reversing,
    Applying,
    Settling,
    Committed,
    Rejected,
}

/// Why a move is being executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveOrigin {
    /// A player's request; recorded in history.
    User,
    /// Issued by the auto-win solver; not recorded.
    AutoWin,
    /// Reversal of a recorded move.
    Undo,
    /// Re-application of an undone move.
    Redo,
}

/// Whether the table is accepting new requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interaction {
    #[default]
    Idle,
    Busy,
}

/// A move that has finished executing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Committed {
    pub mv: Move,
    pub origin: MoveOrigin,
}

#[derive(Clone, Debug)]
struct InFlight {
    mv: Move,
    origin: MoveOrigin,
    phase: MovePhase,
    /// Pile the cards leave this time (the recorded destination on undo).
    from: PileId,
    /// Pile the cards land on this time.
    to: PileId,
    /// Cards whose flips must finish before the next phase.
    watch: SmallVec<[CardId; 2]>,
}

/// Applies and reverses moves, one at a time.
#[derive(Clone, Debug)]
pub struct MoveExecutor {
    layout: Layout,
    in_flight: Option<InFlight>,
    interaction: Interaction,
}

impl MoveExecutor {
    #[must_use]
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            in_flight: None,
            interaction: Interaction::Idle,
        }
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// Phase of the in-flight move, if any.
    #[must_use]
    pub fn phase(&self) -> Option<MovePhase> {
        self.in_flight.as_ref().map(|f| f.phase)
    }

    /// Origin of the in-flight move, if any.
    #[must_use]
    pub fn origin(&self) -> Option<MoveOrigin> {
        self.in_flight.as_ref().map(|f| f.origin)
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none()
    }

    /// Drop any in-flight move (new deal).
    pub fn reset(&mut self) {
        self.in_flight = None;
        self.interaction = Interaction::Idle;
    }

    /// Validate a request to move `cards` onto `destination`.
    ///
    /// `cards` must be the top run of a single pile, in pile order, all
    /// face-up and at rest, and the pivot must satisfy the placement rules.
    pub fn prepare(
        &self,
        table: &Table,
        gate: &TransitionGate,
        cards: &[CardId],
        destination: PileId,
    ) -> Result<Move, MoveError> {
        tracing::debug!(
            target: "klondike.executor",
            phase = ?MovePhase::Requested,
            count = cards.len(),
            %destination,
        );
        let result = Self::validate(table, gate, cards, destination);
        match &result {
            Ok(mv) => {
                tracing::debug!(
                    target: "klondike.executor",
                    phase = ?MovePhase::Validated,
                    source = %mv.source,
                    %destination,
                );
            }
            Err(error) => {
                tracing::debug!(target: "klondike.executor", phase = ?MovePhase::Rejected, %error);
            }
        }
        result
    }

    fn validate(
        table: &Table,
        gate: &TransitionGate,
        cards: &[CardId],
        destination: PileId,
    ) -> Result<Move, MoveError> {
        if !destination.is_valid() {
            return Err(InvalidMove::UnknownPile(destination.0).into());
        }
        if let Some(unknown) = cards.iter().find(|card| !card.is_valid()) {
            return Err(InvalidMove::UnknownCard(unknown.0).into());
        }

        let pivot = *cards.first().ok_or(InvalidMove::EmptySelection)?;
        let source = table.pile_of(pivot).ok_or(InvalidMove::InFlight(pivot))?;

        for &card in cards {
            match table.pile_of(card) {
                None => return Err(InvalidMove::InFlight(card).into()),
                Some(pile) if pile != source => return Err(InvalidMove::MixedSources.into()),
                Some(_) => {}
            }
            if !table.card(card).is_face_up() {
                return Err(InvalidMove::FaceDown(card).into());
            }
            if !gate.is_idle(card) {
                return Err(InvalidMove::InFlight(card).into());
            }
        }

        let pile = table.pile(source);
        let start = pile.len().saturating_sub(cards.len());
        if pile.run_from(start) != cards {
            return Err(InvalidMove::NotTopRun(pivot).into());
        }
        // Only tableau columns hand out runs; elsewhere just the top card.
        if source.section() != Section::Tableau && cards.len() > 1 {
            return Err(InvalidMove::NotTopRun(pivot).into());
        }
        if source == destination {
            return Err(InvalidMove::SamePile(source).into());
        }

        MoveValidator::check(table, pivot, cards.len(), destination)
            .map_err(InvalidMove::from)?;

        Ok(Move::new(cards, source, destination))
    }

    /// Start executing a validated forward move.
    ///
    /// Events already recorded on the move (a draw's flip) are applied when
    /// the cards settle.
    pub fn begin(
        &mut self,
        table: &mut Table,
        gate: &mut TransitionGate,
        mv: Move,
        origin: MoveOrigin,
    ) {
        if mv.special {
            self.begin_special(table, gate, mv, origin);
            return;
        }
        let (from, to) = (mv.source, mv.destination);
        self.launch(table, gate, mv, origin, from, to);
    }

    /// Start reversing a recorded move.
    ///
    /// The move's cards must still be the top run of its destination. A
    /// stale entry is refused before anything is touched.
    pub fn begin_undo(
        &mut self,
        table: &mut Table,
        gate: &mut TransitionGate,
        mut mv: Move,
    ) -> Result<(), MoveError> {
        if mv.special {
            if let Some(event) = mv.special_event_mut() {
                event.reverse();
            }
            self.begin_special(table, gate, mv, MoveOrigin::Undo);
            return Ok(());
        }

        let (from, to) = (mv.destination, mv.source);
        Self::check_recorded(table, gate, &mv, from)?;
        table.pile_mut(from).waiting = true;
        table.pile_mut(to).waiting = true;

        let mut watch = SmallVec::new();
        for event in &mv.events {
            Self::play_event(table, gate, event, &mut watch);
        }

        tracing::debug!(
            target: "klondike.executor",
            phase = ?MovePhase::Reversing,
            events = mv.events.len(),
            %from,
            %to,
        );
        self.in_flight = Some(InFlight {
            mv,
            origin: MoveOrigin::Undo,
            phase: MovePhase::Reversing,
            from,
            to,
            watch,
        });
        self.interaction = Interaction::Busy;
        Ok(())
    }

    /// Start re-applying an undone move.
    ///
    /// Same staleness rule as undo, against the recorded source.
    pub fn begin_redo(
        &mut self,
        table: &mut Table,
        gate: &mut TransitionGate,
        mut mv: Move,
    ) -> Result<(), MoveError> {
        if mv.special {
            if let Some(event) = mv.special_event_mut() {
                event.reverse();
            }
            self.begin_special(table, gate, mv, MoveOrigin::Redo);
            return Ok(());
        }
        let (from, to) = (mv.source, mv.destination);
        Self::check_recorded(table, gate, &mv, from)?;
        self.launch(table, gate, mv, MoveOrigin::Redo, from, to);
        Ok(())
    }

    /// Refuse a history entry whose cards are not the resting top run of `from`.
    fn check_recorded(
        table: &Table,
        gate: &TransitionGate,
        mv: &Move,
        from: PileId,
    ) -> Result<(), MoveError> {
        let pivot = mv.pivot().ok_or(InvalidMove::EmptySelection)?;
        let pile = table.pile(from);
        let count = mv.cards.len();
        let resting = pile.len() >= count
            && pile.run_from(pile.len() - count) == mv.cards.as_slice()
            && gate.all_idle(&mv.cards);
        if !resting {
            tracing::warn!(
                target: "klondike.executor",
                %pivot,
                %from,
                "stale history entry refused",
            );
            return Err(InvalidMove::StaleHistory(pivot).into());
        }
        Ok(())
    }

    fn begin_special(
        &mut self,
        table: &mut Table,
        gate: &mut TransitionGate,
        mv: Move,
        origin: MoveOrigin,
    ) {
        let Some(event) = mv.events.first().copied() else {
            tracing::warn!(target: "klondike.executor", "special move without an event ignored");
            return;
        };

        table.pile_mut(event.pile).waiting = true;
        let moved = event.apply(table);
        for card in moved {
            self.place_at_rest(table, gate, card);
        }
        gate.announce(Cue::Recycle { kind: event.kind });

        tracing::debug!(
            target: "klondike.executor",
            phase = ?MovePhase::Settling,
            kind = ?event.kind,
            ?origin,
            "special move applied",
        );
        self.in_flight = Some(InFlight {
            mv,
            origin,
            phase: MovePhase::Settling,
            from: PileId::TALON,
            to: PileId::STOCK,
            watch: SmallVec::new(),
        });
        self.interaction = Interaction::Busy;
    }

    /// Detach the move's cards from `from` and send them towards `to`.
    fn launch(
        &mut self,
        table: &mut Table,
        gate: &mut TransitionGate,
        mv: Move,
        origin: MoveOrigin,
        from: PileId,
        to: PileId,
    ) {
        table.pile_mut(from).waiting = true;
        table.pile_mut(to).waiting = true;
        self.in_flight = Some(InFlight {
            mv,
            origin,
            phase: MovePhase::Applying,
            from,
            to,
            watch: SmallVec::new(),
        });
        self.interaction = Interaction::Busy;
        self.start_geometry(table, gate);
    }

    fn start_geometry(&mut self, table: &mut Table, gate: &mut TransitionGate) {
        let Some(flight) = self.in_flight.as_mut() else {
            return;
        };
        let count = flight.mv.cards.len();
        let detached = table.detach_top(flight.from, count);
        if detached.as_slice() != flight.mv.cards.as_slice() {
            // Put back what was taken and abandon the move rather than
            // placing cards that belong elsewhere.
            table.attach(flight.from, &detached);
            table.pile_mut(flight.from).waiting = false;
            table.pile_mut(flight.to).waiting = false;
            tracing::warn!(
                target: "klondike.executor",
                from = %flight.from,
                count,
                "detached cards differ from the move; abandoned",
            );
            self.in_flight = None;
            self.interaction = if gate.is_busy() {
                Interaction::Busy
            } else {
                Interaction::Idle
            };
            return;
        }

        let base = table.pile(flight.to).len();
        for (i, &card) in detached.iter().enumerate() {
            let target = self.layout.slot(flight.to, base + i);
            if let Err(conflict) = gate.begin_translate(card, target) {
                tracing::warn!(target: "klondike.executor", %conflict, "translation refused");
            }
        }

        flight.phase = MovePhase::Applying;
        tracing::debug!(
            target: "klondike.executor",
            phase = ?MovePhase::Applying,
            count,
            from = %flight.from,
            to = %flight.to,
            origin = ?flight.origin,
        );
    }

    /// Advance the in-flight move as far as the gate allows.
    ///
    /// Returns the move once it commits.
    pub fn step(&mut self, table: &mut Table, gate: &mut TransitionGate) -> Option<Committed> {
        let phase = self.in_flight.as_ref()?.phase;

        if phase == MovePhase::Reversing {
            let ready = self
                .in_flight
                .as_ref()
                .is_some_and(|f| gate.all_idle(&f.watch));
            if !ready {
                return self.refresh(gate);
            }
            if let Some(flight) = self.in_flight.as_mut() {
                flight.watch.clear();
            }
            self.start_geometry(table, gate);
            return self.refresh(gate);
        }

        if phase == MovePhase::Applying {
            let arrived = self
                .in_flight
                .as_ref()
                .is_some_and(|f| gate.all_idle(&f.mv.cards));
            if !arrived {
                return self.refresh(gate);
            }
            self.settle(table, gate);
        }

        let done = self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.phase == MovePhase::Settling && gate.all_idle(&f.watch));
        if done {
            if let Some(flight) = self.in_flight.take() {
                if flight.mv.special {
                    if let Some(event) = flight.mv.events.first() {
                        table.pile_mut(event.pile).waiting = false;
                    }
                }
                tracing::debug!(
                    target: "klondike.executor",
                    phase = ?MovePhase::Committed,
                    origin = ?flight.origin,
                    events = flight.mv.events.len(),
                );
                self.interaction = if gate.is_busy() {
                    Interaction::Busy
                } else {
                    Interaction::Idle
                };
                return Some(Committed {
                    mv: flight.mv,
                    origin: flight.origin,
                });
            }
        }
        self.refresh(gate)
    }

    fn refresh(&mut self, gate: &TransitionGate) -> Option<Committed> {
        self.interaction = if self.in_flight.is_some() || gate.is_busy() {
            Interaction::Busy
        } else {
            Interaction::Idle
        };
        None
    }

    /// Recompute the interaction flag without stepping.
    pub fn sync_interaction(&mut self, gate: &TransitionGate) {
        self.refresh(gate);
    }

    fn settle(&mut self, table: &mut Table, gate: &mut TransitionGate) {
        let Some(flight) = self.in_flight.as_mut() else {
            return;
        };

        table.attach(flight.to, &flight.mv.cards);
        table.pile_mut(flight.to).waiting = false;
        table.pile_mut(flight.from).waiting = false;

        if flight.origin != MoveOrigin::Undo {
            for event in &flight.mv.events {
                Self::play_event(table, gate, event, &mut flight.watch);
            }
            if matches!(flight.origin, MoveOrigin::User | MoveOrigin::AutoWin) {
                if let Some(card) = Self::reveal(table, gate, flight.from) {
                    flight.mv.push_event(Event::flip(card, flight.from));
                    flight.watch.push(card);
                }
            }
        }

        flight.phase = MovePhase::Settling;
        tracing::debug!(
            target: "klondike.executor",
            phase = ?MovePhase::Settling,
            to = %flight.to,
            flips = flight.watch.len(),
        );
    }

    /// Apply a recorded event, watching any card it flips.
    fn play_event(
        table: &mut Table,
        gate: &mut TransitionGate,
        event: &Event,
        watch: &mut SmallVec<[CardId; 2]>,
    ) {
        if event.kind != EventKind::Flip {
            event.apply(table);
            return;
        }
        for card in event.apply(table) {
            let face = table.card(card).face;
            match gate.begin_flip(card, face) {
                Ok(()) => watch.push(card),
                Err(conflict) => {
                    tracing::warn!(target: "klondike.executor", %conflict, "flip refused");
                }
            }
        }
    }

    /// Turn a tableau pile's face-down top card up, if it is free to turn.
    ///
    /// Gated: nothing happens while the pile is waiting on an in-flight move
    /// or while its top card is still animating.
    pub fn reveal(table: &mut Table, gate: &mut TransitionGate, pile: PileId) -> Option<CardId> {
        if pile.section() != Section::Tableau || table.pile(pile).waiting {
            return None;
        }
        let top = table.top(pile)?;
        if top.is_face_up() || !gate.is_idle(top.id) {
            return None;
        }
        let card = top.id;
        table.set_face(card, Face::Up);
        match gate.begin_flip(card, Face::Up) {
            Ok(()) => Some(card),
            Err(conflict) => {
                table.set_face(card, Face::Down);
                tracing::warn!(target: "klondike.executor", %conflict, "reveal refused");
                None
            }
        }
    }

    fn place_at_rest(&self, table: &Table, gate: &mut TransitionGate, card: CardId) {
        if let Some(pile) = table.pile_of(card) {
            if let Some(index) = table.pile(pile).position_of(card) {
                gate.place(card, self.layout.slot(pile, index));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    fn id(value: u8, suit: Suit) -> CardId {
        CardId::from_parts(value, suit)
    }

    fn run_until_committed(
        executor: &mut MoveExecutor,
        table: &mut Table,
        gate: &mut TransitionGate,
    ) -> Committed {
        for _ in 0..16 {
            gate.tick();
            if let Some(done) = executor.step(table, gate) {
                return done;
            }
        }
        panic!("move never committed");
    }

    fn sample_table() -> Table {
        let col0 = [(id(4, Suit::Clubs), Face::Down), (id(9, Suit::Hearts), Face::Up)];
        let col1 = [(id(8, Suit::Spades), Face::Up), (id(7, Suit::Diamonds), Face::Up)];
        Table::arranged(&[(PileId::tableau(0), &col0), (PileId::tableau(1), &col1)])
    }

    #[test]
    fn test_prepare_accepts_top_run() {
        let table = sample_table();
        let gate = TransitionGate::new(true);
        let executor = MoveExecutor::new(Layout::default());

        let run = [id(8, Suit::Spades), id(7, Suit::Diamonds)];
        let mv = executor.prepare(&table, &gate, &run, PileId::tableau(0)).unwrap();
        assert_eq!(mv.source, PileId::tableau(1));
        assert_eq!(mv.card_count(), 2);
    }

    #[test]
    fn test_prepare_rejects_without_mutation() {
        let table = sample_table();
        let before = table.snapshot();
        let gate = TransitionGate::new(true);
        let executor = MoveExecutor::new(Layout::default());

        let err = executor
            .prepare(&table, &gate, &[id(8, Suit::Spades)], PileId::tableau(0))
            .unwrap_err();
        assert_eq!(err, MoveError::Invalid(InvalidMove::NotTopRun(id(8, Suit::Spades))));

        let err = executor
            .prepare(&table, &gate, &[id(4, Suit::Clubs)], PileId::tableau(2))
            .unwrap_err();
        assert_eq!(err, MoveError::Invalid(InvalidMove::FaceDown(id(4, Suit::Clubs))));

        let err = executor
            .prepare(&table, &gate, &[id(7, Suit::Diamonds)], PileId::tableau(1))
            .unwrap_err();
        assert_eq!(err, MoveError::Invalid(InvalidMove::SamePile(PileId::tableau(1))));

        let err = executor.prepare(&table, &gate, &[], PileId::tableau(1)).unwrap_err();
        assert_eq!(err, MoveError::Invalid(InvalidMove::EmptySelection));

        assert_eq!(table.snapshot(), before);
    }

    #[test]
    fn test_prepare_rejects_unknown_ids() {
        let table = sample_table();
        let gate = TransitionGate::new(true);
        let executor = MoveExecutor::new(Layout::default());

        let err = executor
            .prepare(&table, &gate, &[CardId(60)], PileId::tableau(0))
            .unwrap_err();
        assert_eq!(err, MoveError::Invalid(InvalidMove::UnknownCard(60)));

        let err = executor
            .prepare(&table, &gate, &[id(7, Suit::Diamonds)], PileId(20))
            .unwrap_err();
        assert_eq!(err, MoveError::Invalid(InvalidMove::UnknownPile(20)));
    }

    #[test]
    fn test_forward_move_settles_in_order() {
        let mut table = sample_table();
        let mut gate = TransitionGate::new(true);
        let mut executor = MoveExecutor::new(Layout::default());

        let err = executor
            .prepare(&table, &gate, &[id(9, Suit::Hearts)], PileId::tableau(2))
            .unwrap_err();
        assert!(
            matches!(err, MoveError::Invalid(InvalidMove::Rule(_))),
            "9h onto an empty column"
        );

        let run = [id(8, Suit::Spades), id(7, Suit::Diamonds)];
        let mv = executor.prepare(&table, &gate, &run, PileId::tableau(0)).unwrap();
        executor.begin(&mut table, &mut gate, mv, MoveOrigin::User);
        assert_eq!(executor.interaction(), Interaction::Busy);
        assert_eq!(table.pile_of(id(8, Suit::Spades)), None, "detached while in flight");

        let done = run_until_committed(&mut executor, &mut table, &mut gate);
        assert_eq!(done.origin, MoveOrigin::User);
        assert!(done.mv.events.is_empty(), "source emptied, nothing to reveal");
        assert_eq!(
            table.pile(PileId::tableau(0)).cards(),
            &[id(4, Suit::Clubs), id(9, Suit::Hearts), id(8, Suit::Spades), id(7, Suit::Diamonds)]
        );
        assert!(!table.pile(PileId::tableau(0)).waiting);
        assert!(!table.pile(PileId::tableau(1)).waiting);
    }

    #[test]
    fn test_reveal_recorded_then_undone() {
        let ten = [(id(10, Suit::Spades), Face::Up)];
        let col0 = [(id(4, Suit::Clubs), Face::Down), (id(9, Suit::Hearts), Face::Up)];
        let mut table = Table::arranged(&[(PileId::tableau(0), &col0), (PileId::tableau(3), &ten)]);
        let mut gate = TransitionGate::new(true);
        let mut executor = MoveExecutor::new(Layout::default());

        let mv = executor
            .prepare(&table, &gate, &[id(9, Suit::Hearts)], PileId::tableau(3))
            .unwrap();
        executor.begin(&mut table, &mut gate, mv, MoveOrigin::User);
        let done = run_until_committed(&mut executor, &mut table, &mut gate);

        let reveal = Event::flip(id(4, Suit::Clubs), PileId::tableau(0));
        assert_eq!(done.mv.events.as_slice(), &[reveal]);
        assert!(table.card(id(4, Suit::Clubs)).is_face_up());
        let after = table.snapshot();

        executor.begin_undo(&mut table, &mut gate, done.mv.clone()).unwrap();
        assert_eq!(executor.phase(), Some(MovePhase::Reversing));
        let undone = run_until_committed(&mut executor, &mut table, &mut gate);
        assert_eq!(undone.origin, MoveOrigin::Undo);
        assert!(!table.card(id(4, Suit::Clubs)).is_face_up());
        assert_eq!(table.pile(PileId::tableau(0)).top(), Some(id(9, Suit::Hearts)));

        executor.begin_redo(&mut table, &mut gate, undone.mv).unwrap();
        let redone = run_until_committed(&mut executor, &mut table, &mut gate);
        assert_eq!(redone.mv.events.len(), 1, "redo replays, it does not re-derive");
        assert_eq!(table.snapshot(), after);
    }

    #[test]
    fn test_stale_undo_refused_without_mutation() {
        let ten = [(id(10, Suit::Spades), Face::Up)];
        let col0 = [(id(4, Suit::Clubs), Face::Up), (id(9, Suit::Hearts), Face::Up)];
        let mut table = Table::arranged(&[(PileId::tableau(0), &col0), (PileId::tableau(3), &ten)]);
        let mut gate = TransitionGate::new(true);
        let mut executor = MoveExecutor::new(Layout::default());

        let mv = executor
            .prepare(&table, &gate, &[id(9, Suit::Hearts)], PileId::tableau(3))
            .unwrap();
        executor.begin(&mut table, &mut gate, mv, MoveOrigin::User);
        let done = run_until_committed(&mut executor, &mut table, &mut gate);

        // Something else takes the 9h away before the undo arrives.
        let taken = table.detach_top(PileId::tableau(3), 1);
        table.attach(PileId::tableau(5), &taken);
        let before = table.snapshot();

        let err = executor
            .begin_undo(&mut table, &mut gate, done.mv.clone())
            .unwrap_err();
        assert_eq!(err, MoveError::Invalid(InvalidMove::StaleHistory(id(9, Suit::Hearts))));
        assert!(executor.is_idle());
        assert_eq!(executor.interaction(), Interaction::Idle);
        assert_eq!(table.snapshot(), before);
        assert!(!table.pile(PileId::tableau(3)).waiting);

        let err = executor.begin_redo(&mut table, &mut gate, done.mv).unwrap_err();
        assert_eq!(err, MoveError::Invalid(InvalidMove::StaleHistory(id(9, Suit::Hearts))));
        assert_eq!(table.snapshot(), before);
    }

    #[test]
    fn test_special_move_commits_next_step() {
        let talon: Vec<_> = (1..=3).map(|v| (id(v, Suit::Hearts), Face::Up)).collect();
        let mut table = Table::arranged(&[(PileId::TALON, &talon)]);
        let rest = table.detach_top(PileId::STOCK, 52);
        table.attach(PileId::tableau(0), &rest);

        let mut gate = TransitionGate::new(true);
        let mut executor = MoveExecutor::new(Layout::default());

        executor.begin(&mut table, &mut gate, Move::recycle(), MoveOrigin::User);
        assert!(table.pile(PileId::STOCK).waiting);
        assert_eq!(table.pile(PileId::STOCK).len(), 2);
        assert!(gate
            .drain_cues()
            .contains(&Cue::Recycle { kind: EventKind::Replenish }));

        let done = run_until_committed(&mut executor, &mut table, &mut gate);
        assert!(done.mv.special);
        assert!(!table.pile(PileId::STOCK).waiting);
        assert_eq!(executor.interaction(), Interaction::Idle);
    }

    #[test]
    fn test_waits_for_real_arrival() {
        let mut table = sample_table();
        let mut gate = TransitionGate::new(false);
        let mut executor = MoveExecutor::new(Layout::default());

        let run = [id(8, Suit::Spades), id(7, Suit::Diamonds)];
        let mv = executor.prepare(&table, &gate, &run, PileId::tableau(0)).unwrap();
        executor.begin(&mut table, &mut gate, mv, MoveOrigin::User);

        for _ in 0..5 {
            gate.tick();
            assert!(executor.step(&mut table, &mut gate).is_none());
        }
        assert_eq!(executor.phase(), Some(MovePhase::Applying));

        gate.snap_all();
        gate.tick();
        assert!(executor.step(&mut table, &mut gate).is_some());
    }
}
