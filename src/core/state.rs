//! Game-level state machine.
//!
//! ```text
//! PLAYING ⇄ PAUSED
//!    │
//!    ▼ (all 52 cards on foundations)
//! WON_PLAYING ⇄ WON_PAUSED
//! ```
//!
//! Reset returns any state to a freshly dealt `Playing`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Playing,
    Paused,
    WonPlaying,
    WonPaused,
}

impl GameState {
    /// Pause toggle.
    #[must_use]
    pub const fn toggle_pause(self) -> Self {
        match self {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            GameState::WonPlaying => GameState::WonPaused,
            GameState::WonPaused => GameState::WonPlaying,
        }
    }

    /// Transition taken when the layout becomes won.
    ///
    /// Only `Playing` moves; a paused game cannot commit moves, and a won
    /// game stays won.
    #[must_use]
    pub const fn on_won(self) -> Self {
        match self {
            GameState::Playing => GameState::WonPlaying,
            other => other,
        }
    }

    #[must_use]
    pub const fn is_paused(self) -> bool {
        matches!(self, GameState::Paused | GameState::WonPaused)
    }

    #[must_use]
    pub const fn is_won(self) -> bool {
        matches!(self, GameState::WonPlaying | GameState::WonPaused)
    }

    /// Whether move requests are accepted at all.
    #[must_use]
    pub const fn accepts_moves(self) -> bool {
        matches!(self, GameState::Playing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_toggle_round_trips() {
        for state in [
            GameState::Playing,
            GameState::Paused,
            GameState::WonPlaying,
            GameState::WonPaused,
        ] {
            assert_eq!(state.toggle_pause().toggle_pause(), state);
        }
        assert_eq!(GameState::Playing.toggle_pause(), GameState::Paused);
        assert_eq!(GameState::WonPlaying.toggle_pause(), GameState::WonPaused);
    }

    #[test]
    fn test_won_only_from_playing() {
        assert_eq!(GameState::Playing.on_won(), GameState::WonPlaying);
        assert_eq!(GameState::Paused.on_won(), GameState::Paused);
        assert_eq!(GameState::WonPaused.on_won(), GameState::WonPaused);
    }

    #[test]
    fn test_predicates() {
        assert!(GameState::Playing.accepts_moves());
        assert!(!GameState::Paused.accepts_moves());
        assert!(!GameState::WonPlaying.accepts_moves());
        assert!(GameState::WonPaused.is_paused());
        assert!(GameState::WonPaused.is_won());
        assert!(!GameState::Paused.is_won());
    }
}
