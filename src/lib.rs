//! # klondike-engine
//!
//! Game-state and move engine for single-player Klondike solitaire.
//!
//! ## Design Principles
//!
//! 1. **Explicit Context**: One `Klondike` value owns a whole game. No
//!    globals; independent games never share state.
//!
//! 2. **Tick-Driven**: The host calls `advance(dt_ms)` once per frame. Moves
//!    complete across ticks, gated on card transitions finishing.
//!
//! 3. **Reversible**: Every committed move records the events it caused, so
//!    undo and redo restore the table exactly.
//!
//! ## Architecture
//!
//! - **Owner Index**: Piles hold card ids in stack order; each card knows
//!   its pile. `Table` keeps both sides in sync.
//!
//! - **Persistent History**: Undo/redo stacks use `im-rs` vectors with O(1)
//!   eviction of the oldest entry.
//!
//! - **Headless by Default**: Rendering is a collaborator. The engine emits
//!   `Cue`s and waits for arrival and flip reports, or snaps transitions
//!   instantly when configured to.
//!
//! ## Modules
//!
//! - `cards`: Card identity, facing and the deck
//! - `core`: Configuration, errors, game state, geometry, RNG
//! - `piles`: Piles, the table and snapshots
//! - `rules`: Placement rules, next-available-move, win detection
//! - `history`: Events, moves and the undo/redo stacks
//! - `transition`: Per-card transition gate and animation cues
//! - `engine`: Executor, auto-win solver, observer and the game context

pub mod cards;
pub mod core;
pub mod engine;
pub mod history;
pub mod piles;
pub mod rules;
pub mod transition;

// Re-export commonly used types
pub use crate::cards::{Card, CardId, Color, Deck, Face, Suit, DECK_SIZE};

pub use crate::core::{
    DealRng, DealRngState, EngineConfig, GameState, InvalidMove, Layout, MoveError, Position,
    SnapshotError,
};

pub use crate::piles::{Census, Pile, PileId, Section, Table, TableSnapshot};

pub use crate::rules::{
    next_available_move, next_foundation_move, MoveValidator, Rejection, WinTracker,
};

pub use crate::history::{Event, EventKind, Move, MoveHistory};

pub use crate::transition::{CardMotion, Cue, GateConflict, TransitionGate};

pub use crate::engine::{
    AutoWinSolver, GameObserver, Interaction, Klondike, MoveExecutor, MoveOrigin, MovePhase,
    NullObserver, SolverOutcome, SolverStep, Tally,
};
