//! Notifications for stats and UI collaborators.
//!
//! The engine owns one observer and calls it as the game progresses:
//! - `on_move_committed`: a player or auto-win move finished (tally)
//! - `on_won`: the last card reached the foundations
//! - `on_lost`: an unfinished game with at least one move was reset
//! - `on_rejected`: a request was refused for a reason worth showing
//!
//! Every method has a no-op default, so an observer only overrides what it
//! cares about.

use serde::{Deserialize, Serialize};

use crate::core::MoveError;

/// Game notification sink.
pub trait GameObserver {
    /// A forward move committed. Undo and redo do not count.
    fn on_move_committed(&mut self) {}

    /// The game was won after `elapsed_ms` of unpaused play.
    fn on_won(&mut self, elapsed_ms: u64) {
        let _ = elapsed_ms;
    }

    /// An unwon game with committed moves was abandoned.
    fn on_lost(&mut self) {}

    /// A request was refused.
    ///
    /// Not called for requests refused only because the table was busy.
    fn on_rejected(&mut self, error: &MoveError) {
        let _ = error;
    }
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl GameObserver for NullObserver {}

/// Observer that counts what it sees.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub moves: u32,
    pub wins: u32,
    pub losses: u32,
    pub rejections: u32,
    /// Elapsed time reported by the most recent win.
    pub last_win_ms: Option<u64>,
}

impl GameObserver for Tally {
    fn on_move_committed(&mut self) {
        self.moves += 1;
    }

    fn on_won(&mut self, elapsed_ms: u64) {
        self.wins += 1;
        self.last_win_ms = Some(elapsed_ms);
    }

    fn on_lost(&mut self) {
        self.losses += 1;
    }

    fn on_rejected(&mut self, _error: &MoveError) {
        self.rejections += 1;
    }
}
