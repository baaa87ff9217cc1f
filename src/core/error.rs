//! Error types.
//!
//! Every public request returns `Result<(), MoveError>`. A rejected request
//! never leaves partial state behind: validation happens before any card is
//! detached from its pile.

use thiserror::Error;

use crate::cards::CardId;
use crate::piles::PileId;
use crate::rules::Rejection;

use super::state::GameState;

/// Why a move request was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The move breaks a placement rule or names an impossible selection.
    #[error("invalid move: {0}")]
    Invalid(#[from] InvalidMove),

    /// Another move, flip or the auto-win solver still owns the table.
    #[error("interaction blocked by an in-flight transition")]
    Concurrent,

    /// Nothing to undo or redo.
    #[error("history is empty")]
    EmptyHistory,

    /// Paused or already won.
    #[error("not accepting requests in state {0:?}")]
    NotPlaying(GameState),

    /// Auto-win requested outside the winnable state.
    #[error("layout is not in a winnable state")]
    NotWinnable,
}

/// Specific rule or selection violation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidMove {
    #[error("no cards selected")]
    EmptySelection,

    #[error("selected cards are not all on the same pile")]
    MixedSources,

    #[error("{0} is not part of the top run of its pile")]
    NotTopRun(CardId),

    #[error("{0} is face-down")]
    FaceDown(CardId),

    #[error("{0} is in flight")]
    InFlight(CardId),

    #[error("source and destination are both {0}")]
    SamePile(PileId),

    #[error("{0}")]
    Rule(#[from] Rejection),

    #[error("stock and talon are both empty")]
    NothingToDraw,

    #[error("no legal destination for {0}")]
    NoDestination(CardId),

    #[error("card id {0} is outside the deck")]
    UnknownCard(u8),

    #[error("pile id {0} is outside the table")]
    UnknownPile(u8),

    /// A recorded move whose cards are no longer the top run it left.
    #[error("history entry for {0} no longer matches the table")]
    StaleHistory(CardId),
}

/// Failure to decode a table checkpoint.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("encoding failed: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("card id {0} is outside the deck")]
    UnknownCard(u8),

    #[error("card id {0} appears more than once")]
    DuplicateCard(u8),

    #[error("expected 13 piles, found {0}")]
    PileCount(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    #[test]
    fn test_messages() {
        let card = CardId::from_parts(12, Suit::Hearts);
        assert_eq!(
            MoveError::from(InvalidMove::FaceDown(card)).to_string(),
            "invalid move: Qh is face-down"
        );
        assert_eq!(
            MoveError::NotPlaying(GameState::Paused).to_string(),
            "not accepting requests in state Paused"
        );
    }

    #[test]
    fn test_rejection_converts() {
        let err: MoveError = InvalidMove::from(Rejection::MultipleToFoundation).into();
        assert!(matches!(err, MoveError::Invalid(InvalidMove::Rule(_))));
    }
}
