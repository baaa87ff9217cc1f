//! The move engine.
//!
//! - `MoveExecutor`: runs one move at a time through its lifecycle
//! - `AutoWinSolver`: greedy foundation-filling autopilot
//! - `GameObserver`: notification hooks for stats and UI
//! - `Klondike`: the context object tying a game together

pub mod executor;
pub mod game;
pub mod observer;
pub mod solver;

pub use executor::{Committed, Interaction, MoveExecutor, MoveOrigin, MovePhase};
pub use game::Klondike;
pub use observer::{GameObserver, NullObserver, Tally};
pub use solver::{AutoWinSolver, SolverOutcome, SolverStep};
