//! Card transitions and the interaction gate.
//!
//! Moves and flips take time on screen. The `TransitionGate` tracks which
//! cards are mid-animation and is the engine's only suspension point: the
//! executor and the auto-win solver both wait on it before committing or
//! stepping.

pub mod gate;

pub use gate::{CardMotion, Cue, GateConflict, TransitionGate};
