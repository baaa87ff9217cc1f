//! Core engine types: configuration, errors, game state, geometry, RNG.

pub mod config;
pub mod error;
pub mod layout;
pub mod rng;
pub mod state;

pub use config::{EngineConfig, MAX_AUTO_WIN_ATTEMPTS, MAX_HISTORY, WINNABLE_SLACK};
pub use error::{InvalidMove, MoveError, SnapshotError};
pub use layout::{Layout, Position};
pub use rng::{DealRng, DealRngState};
pub use state::GameState;
