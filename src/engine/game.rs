//! The game context.
//!
//! `Klondike` owns everything one game needs: the table, the history, the
//! transition gate, the executor, the solver and the observer. It is built
//! once and driven by its host through `request_*` calls and a per-tick
//! `advance`.
//!
//! ## Requests
//!
//! Requests are validated synchronously. An accepted request starts a move
//! and returns `Ok(())`; the move then completes over subsequent ticks. While
//! a move, a flip or the auto-win solver is in progress the table is
//! blocked and every request fails with `MoveError::Concurrent`.
//!
//! ## Ticks
//!
//! `advance(dt_ms)` runs, in order:
//! 1. accrue play time (only while playing)
//! 2. retire finished transitions
//! 3. step the in-flight move
//! 4. reveal newly exposed face-down tableau tops
//! 5. commit bookkeeping and win detection
//! 6. winnable tracking
//! 7. one auto-win step, if the table is free
//!
//! and returns the animation cues produced along the way.

use crate::cards::{CardId, Deck};
use crate::core::{DealRng, EngineConfig, GameState, InvalidMove, MoveError};
use crate::history::{Event, Move, MoveHistory};
use crate::piles::{PileId, Table};
use crate::rules::{next_available_move, WinTracker};
use crate::transition::{Cue, TransitionGate};

use super::executor::{Committed, Interaction, MoveExecutor, MoveOrigin};
use super::observer::{GameObserver, NullObserver};
use super::solver::{AutoWinSolver, SolverStep};

/// A single game of Klondike.
pub struct Klondike<O: GameObserver = NullObserver> {
    config: EngineConfig,
    rng: DealRng,
    table: Table,
    history: MoveHistory,
    gate: TransitionGate,
    executor: MoveExecutor,
    solver: Option<AutoWinSolver>,
    tracker: WinTracker,
    state: GameState,
    elapsed_ms: u64,
    moves_committed: u32,
    auto_win_completed: bool,
    observer: O,
}

impl Klondike<NullObserver> {
    /// Deal a new game.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_observer(config, NullObserver)
    }

    /// Start from an explicit table instead of a deal.
    #[must_use]
    pub fn with_table(config: EngineConfig, table: Table) -> Self {
        Self::from_table(config, table, NullObserver)
    }
}

impl<O: GameObserver> Klondike<O> {
    /// Deal a new game reporting to `observer`.
    #[must_use]
    pub fn with_observer(config: EngineConfig, observer: O) -> Self {
        let mut rng = DealRng::new(config.seed);
        let table = Table::dealt(&Deck::shuffled(&mut rng));
        Self::assemble(config, rng, table, observer)
    }

    /// Start from an explicit table, reporting to `observer`.
    ///
    /// Later resets deal from the configured seed.
    #[must_use]
    pub fn from_table(config: EngineConfig, table: Table, observer: O) -> Self {
        let rng = DealRng::new(config.seed);
        Self::assemble(config, rng, table, observer)
    }

    fn assemble(config: EngineConfig, rng: DealRng, table: Table, observer: O) -> Self {
        let mut game = Self {
            history: MoveHistory::new(config.max_history),
            gate: TransitionGate::new(config.instant_transitions),
            executor: MoveExecutor::new(config.layout.clone()),
            tracker: WinTracker::new(config.winnable_slack),
            solver: None,
            state: GameState::Playing,
            elapsed_ms: 0,
            moves_committed: 0,
            auto_win_completed: false,
            config,
            rng,
            table,
            observer,
        };
        game.place_all();
        game.tracker.observe(&game.table.census());
        game
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    #[must_use]
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    #[must_use]
    pub fn gate(&self) -> &TransitionGate {
        &self.gate
    }

    /// For the animation collaborator's arrival and flip reports.
    pub fn gate_mut(&mut self) -> &mut TransitionGate {
        &mut self.gate
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Unpaused play time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Forward moves committed this game, auto-win moves included.
    #[must_use]
    pub fn moves_committed(&self) -> u32 {
        self.moves_committed
    }

    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Deals since the RNG was seeded, the first included.
    #[must_use]
    pub fn deals(&self) -> u64 {
        self.rng.deals()
    }

    // === Availability ===

    /// A move, flip or auto-win run owns the table.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        !self.executor.is_idle() || self.gate.is_busy() || self.solver.is_some()
    }

    #[must_use]
    pub fn interaction(&self) -> Interaction {
        if self.is_blocked() {
            Interaction::Busy
        } else {
            Interaction::Idle
        }
    }

    #[must_use]
    pub fn is_auto_winning(&self) -> bool {
        self.solver.is_some()
    }

    #[must_use]
    pub fn is_winnable(&self) -> bool {
        self.tracker.is_winnable()
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        self.table.is_won()
    }

    #[must_use]
    pub fn is_undo_available(&self) -> bool {
        self.history.can_undo() && self.history_unlocked()
    }

    #[must_use]
    pub fn is_redo_available(&self) -> bool {
        self.history.can_redo() && self.history_unlocked()
    }

    fn history_unlocked(&self) -> bool {
        !self.is_auto_winning() && !self.state.is_paused() && !self.state.is_won()
    }

    #[must_use]
    pub fn is_auto_win_available(&self) -> bool {
        self.tracker.is_winnable()
            && self.state.accepts_moves()
            && !self.is_blocked()
            && !self.auto_win_completed
    }

    // === Requests ===

    /// Move `cards` (a top run, bottom card first) onto `destination`.
    pub fn request_move(
        &mut self,
        cards: &[CardId],
        destination: PileId,
    ) -> Result<(), MoveError> {
        self.admit()?;
        self.start_move(cards, destination)
    }

    /// Move `card` and everything above it to the best legal destination.
    pub fn request_double_click_move(&mut self, card: CardId) -> Result<(), MoveError> {
        self.admit()?;
        if !card.is_valid() {
            return self.reject(InvalidMove::UnknownCard(card.0).into());
        }

        let located = self
            .table
            .pile_of(card)
            .and_then(|pile| Some((pile, self.table.pile(pile).position_of(card)?)));
        let Some((source, index)) = located else {
            return self.reject(InvalidMove::InFlight(card).into());
        };
        if !self.table.card(card).is_face_up() {
            return self.reject(InvalidMove::FaceDown(card).into());
        }

        let run = self.table.pile(source).run_from(index).to_vec();
        let layout = self.executor.layout();
        let from = self
            .gate
            .position(card)
            .unwrap_or_else(|| layout.slot(source, index));
        match next_available_move(&self.table, layout, card, run.len(), from) {
            Some(destination) => self.start_move(&run, destination),
            None => self.reject(InvalidMove::NoDestination(card).into()),
        }
    }

    /// Draw the top stock card onto the talon, or recycle the talon when the
    /// stock is empty.
    pub fn request_draw_from_stock(&mut self) -> Result<(), MoveError> {
        self.admit()?;

        if let Some(top) = self.table.pile(PileId::STOCK).top() {
            let mut mv = Move::new(&[top], PileId::STOCK, PileId::TALON);
            mv.push_event(Event::flip(top, PileId::TALON));
            self.executor
                .begin(&mut self.table, &mut self.gate, mv, MoveOrigin::User);
            return Ok(());
        }
        if self.table.pile(PileId::TALON).is_empty() {
            return self.reject(InvalidMove::NothingToDraw.into());
        }
        self.executor
            .begin(&mut self.table, &mut self.gate, Move::recycle(), MoveOrigin::User);
        Ok(())
    }

    pub fn request_undo(&mut self) -> Result<(), MoveError> {
        self.admit()?;
        let Some(mv) = self.history.pop_undo() else {
            return self.reject(MoveError::EmptyHistory);
        };
        tracing::debug!(
            target: "klondike.game",
            source = %mv.source,
            destination = %mv.destination,
            "undo",
        );
        match self.executor.begin_undo(&mut self.table, &mut self.gate, mv) {
            Ok(()) => Ok(()),
            Err(error) => self.discard_history(error),
        }
    }

    pub fn request_redo(&mut self) -> Result<(), MoveError> {
        self.admit()?;
        let Some(mv) = self.history.pop_redo() else {
            return self.reject(MoveError::EmptyHistory);
        };
        tracing::debug!(
            target: "klondike.game",
            source = %mv.source,
            destination = %mv.destination,
            "redo",
        );
        match self.executor.begin_redo(&mut self.table, &mut self.gate, mv) {
            Ok(()) => Ok(()),
            Err(error) => self.discard_history(error),
        }
    }

    /// Entries below a stale one were recorded against the same lost state.
    fn discard_history(&mut self, error: MoveError) -> Result<(), MoveError> {
        tracing::warn!(
            target: "klondike.game",
            %error,
            "history no longer matches the table; cleared",
        );
        self.history.clear();
        self.reject(error)
    }

    /// Abandon the current game and deal the next one.
    ///
    /// Allowed while paused or won, but not while the table is blocked.
    pub fn request_reset(&mut self) -> Result<(), MoveError> {
        if self.is_blocked() {
            return Err(MoveError::Concurrent);
        }
        if !self.state.is_won() && self.moves_committed > 0 {
            tracing::info!(target: "klondike.game", moves = self.moves_committed, "game lost");
            self.observer.on_lost();
        }

        let deck = Deck::shuffled(&mut self.rng);
        self.table.deal(&deck);
        self.gate.clear();
        self.executor.reset();
        self.history.clear();
        self.tracker.reset();
        self.solver = None;
        self.state = GameState::Playing;
        self.elapsed_ms = 0;
        self.moves_committed = 0;
        self.auto_win_completed = false;

        self.place_all();
        self.tracker.observe(&self.table.census());
        tracing::info!(target: "klondike.game", deal = self.rng.deals(), "new game dealt");
        Ok(())
    }

    /// Toggle pause. Returns the new state.
    pub fn toggle_pause(&mut self) -> GameState {
        self.state = self.state.toggle_pause();
        tracing::info!(target: "klondike.game", state = ?self.state, "pause toggled");
        self.state
    }

    /// Hand the table to the auto-win solver.
    pub fn request_auto_win(&mut self) -> Result<(), MoveError> {
        self.admit()?;
        if self.auto_win_completed || !self.tracker.is_winnable() {
            return self.reject(MoveError::NotWinnable);
        }
        // Solver moves are not recorded, so nothing before them can be undone.
        self.history.clear();
        self.solver = Some(AutoWinSolver::new(self.config.max_auto_win_attempts));
        tracing::info!(
            target: "klondike.game",
            max_attempts = self.config.max_auto_win_attempts,
            "auto-win started",
        );
        Ok(())
    }

    fn admit(&mut self) -> Result<(), MoveError> {
        if self.is_blocked() {
            tracing::trace!(target: "klondike.game", "request ignored, table busy");
            return Err(MoveError::Concurrent);
        }
        if !self.state.accepts_moves() {
            return self.reject(MoveError::NotPlaying(self.state));
        }
        Ok(())
    }

    fn reject(&mut self, error: MoveError) -> Result<(), MoveError> {
        tracing::debug!(target: "klondike.game", %error, "request rejected");
        self.observer.on_rejected(&error);
        Err(error)
    }

    fn start_move(&mut self, cards: &[CardId], destination: PileId) -> Result<(), MoveError> {
        match self.executor.prepare(&self.table, &self.gate, cards, destination) {
            Ok(mv) => {
                self.executor
                    .begin(&mut self.table, &mut self.gate, mv, MoveOrigin::User);
                Ok(())
            }
            Err(error) => self.reject(error),
        }
    }

    // === Ticks ===

    /// Advance the engine by one tick of `dt_ms` milliseconds.
    pub fn advance(&mut self, dt_ms: u64) -> Vec<Cue> {
        if self.state == GameState::Playing {
            self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        }

        self.gate.tick();
        if let Some(done) = self.executor.step(&mut self.table, &mut self.gate) {
            self.commit(done);
        }
        self.reveal_pass();
        self.check_won();
        self.tracker.observe(&self.table.census());
        self.step_solver();
        self.executor.sync_interaction(&self.gate);

        self.gate.drain_cues()
    }

    /// Tick until the table is free, finishing every transition as it
    /// starts. Gives up after `max_ticks`.
    ///
    /// For hosts with no animation collaborator.
    pub fn advance_until_idle(&mut self, max_ticks: usize) -> Vec<Cue> {
        let mut cues = Vec::new();
        for _ in 0..max_ticks {
            if !self.is_blocked() {
                break;
            }
            self.gate.snap_all();
            cues.extend(self.advance(0));
        }
        cues
    }

    fn commit(&mut self, done: Committed) {
        let Committed { mv, origin } = done;
        match origin {
            MoveOrigin::User => {
                self.history.record(mv);
                self.count_move();
            }
            MoveOrigin::AutoWin => self.count_move(),
            MoveOrigin::Undo => self.history.push_redo(mv),
            MoveOrigin::Redo => self.history.push_undo(mv),
        }
    }

    fn count_move(&mut self) {
        self.moves_committed += 1;
        self.observer.on_move_committed();
    }

    fn reveal_pass(&mut self) {
        for pile in PileId::tableaus() {
            if let Some(card) = MoveExecutor::reveal(&mut self.table, &mut self.gate, pile) {
                tracing::debug!(target: "klondike.game", %card, %pile, "revealed");
            }
        }
    }

    fn check_won(&mut self) {
        if self.state == GameState::Playing && self.table.is_won() {
            self.state = self.state.on_won();
            tracing::info!(
                target: "klondike.game",
                elapsed_ms = self.elapsed_ms,
                moves = self.moves_committed,
                "game won",
            );
            self.observer.on_won(self.elapsed_ms);
        }
    }

    fn step_solver(&mut self) {
        if self.state.is_paused() || !self.executor.is_idle() || self.gate.is_busy() {
            return;
        }
        let Some(solver) = self.solver.as_mut() else {
            return;
        };
        match solver.step(&self.table) {
            SolverStep::Execute(mv) => {
                self.executor
                    .begin(&mut self.table, &mut self.gate, mv, MoveOrigin::AutoWin);
            }
            SolverStep::Done(outcome) => {
                tracing::info!(target: "klondike.game", ?outcome, "auto-win finished");
                self.solver = None;
                self.auto_win_completed = true;
            }
        }
    }

    /// Put every card at its resting slot.
    fn place_all(&mut self) {
        let layout = self.executor.layout();
        for pile in self.table.piles() {
            for (index, &card) in pile.cards().iter().enumerate() {
                self.gate.place(card, layout.slot(pile.id, index));
            }
        }
    }
}

impl Default for Klondike<NullObserver> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
