//! Reversible move history.
//!
//! - `Event`: a primitive side effect (flip, replenish, deplenish)
//! - `Move`: relocated cards plus the events that followed
//! - `MoveHistory`: bounded undo/redo stacks
//!
//! Undo pops a move, reverses its events in recorded order, then sends the
//! cards back. Redo sends them forward again and replays the events.

pub mod event;
pub mod moves;
pub mod stack;

pub use event::{Event, EventKind};
pub use moves::Move;
pub use stack::MoveHistory;
