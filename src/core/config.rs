//! Engine configuration.

use serde::{Deserialize, Serialize};

use super::layout::Layout;

/// Default undo/redo capacity.
pub const MAX_HISTORY: usize = 1000;

/// Default bound on auto-win solver iterations.
pub const MAX_AUTO_WIN_ATTEMPTS: u32 = 5000;

/// Default hysteresis width of the winnable indicator.
pub const WINNABLE_SLACK: usize = 13;

/// Engine configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of each history stack. The oldest entry is evicted past it.
    pub max_history: usize,

    /// Outer-loop bound of the auto-win solver.
    pub max_auto_win_attempts: u32,

    /// How many cards may leave tableau+foundation before a winnable layout
    /// stops being winnable.
    pub winnable_slack: usize,

    /// Translations land on their targets in the tick they begin and flips
    /// finish on the next tick. For headless hosts and tests.
    pub instant_transitions: bool,

    /// Deal RNG seed.
    pub seed: u64,

    /// Table geometry.
    pub layout: Layout,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_history: MAX_HISTORY,
            max_auto_win_attempts: MAX_AUTO_WIN_ATTEMPTS,
            winnable_slack: WINNABLE_SLACK,
            instant_transitions: false,
            seed: 42,
            layout: Layout::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    pub fn with_max_auto_win_attempts(mut self, attempts: u32) -> Self {
        self.max_auto_win_attempts = attempts;
        self
    }

    pub fn with_instant_transitions(mut self, instant: bool) -> Self {
        self.instant_transitions = instant;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }
}
