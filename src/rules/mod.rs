//! Klondike rules.
//!
//! Everything here is a pure function of the table: placement legality,
//! the next-available-move query and win/winnable detection. The engine
//! calls into these but they never mutate anything.

pub mod hint;
pub mod validator;
pub mod winnable;

pub use hint::{next_available_move, next_foundation_move};
pub use validator::{MoveValidator, Rejection};
pub use winnable::{is_won, WinTracker};
