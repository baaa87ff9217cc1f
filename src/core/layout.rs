//! Table geometry.
//!
//! The engine does not render anything, but two of its rules are positional:
//! the executor computes where each moved card must land, and the
//! next-available-move query picks the nearest legal tableau pile. `Layout`
//! is the minimal geometry both need.
//!
//! ## Slots
//!
//! A pile's slot `i` is where its `i`-th card (0 = bottom) rests:
//! - Tableau piles fan downward by `fan_offset` per card
//! - Foundations, Stock and Talon stack in place
//!
//! Every slot also steps `z` by `-z_step`, so cards higher in a stack sit
//! nearer the camera.

use serde::{Deserialize, Serialize};

use crate::piles::{PileId, Section};

/// A point in table space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Bit-for-bit equality.
    ///
    /// Arrival is exact: an animation has completed only when it reports the
    /// very target value, not something within epsilon of it.
    #[must_use]
    pub fn same_bits(&self, other: &Position) -> bool {
        self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.z.to_bits() == other.z.to_bits()
    }

    /// Squared planar distance (z ignored).
    #[must_use]
    pub fn distance_sq(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Pile anchors and stacking offsets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Top-left of the first foundation; the rest follow at `column_spacing`.
    pub foundation_origin: Position,

    /// Top of the first tableau column; the rest follow at `column_spacing`.
    pub tableau_origin: Position,

    /// Stock anchor.
    pub stock: Position,

    /// Talon anchor.
    pub talon: Position,

    /// Horizontal distance between neighbouring columns.
    pub column_spacing: f32,

    /// Vertical offset per card in a tableau fan (negative = downward).
    pub fan_offset: f32,

    /// Depth step per card in any pile.
    pub z_step: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            foundation_origin: Position::new(3.0, 0.0, 0.0),
            tableau_origin: Position::new(0.0, -1.5, 0.0),
            stock: Position::new(0.0, 0.0, 0.0),
            talon: Position::new(1.0, 0.0, 0.0),
            column_spacing: 1.0,
            fan_offset: -0.3,
            z_step: 0.01,
        }
    }
}

impl Layout {
    /// Anchor of a pile (its slot 0, before depth).
    #[must_use]
    pub fn anchor(&self, pile: PileId) -> Position {
        match pile.section() {
            Section::Foundation => {
                let col = pile.index_in_section() as f32;
                Position::new(
                    self.foundation_origin.x + col * self.column_spacing,
                    self.foundation_origin.y,
                    self.foundation_origin.z,
                )
            }
            Section::Tableau => {
                let col = pile.index_in_section() as f32;
                Position::new(
                    self.tableau_origin.x + col * self.column_spacing,
                    self.tableau_origin.y,
                    self.tableau_origin.z,
                )
            }
            Section::Stock => self.stock,
            Section::Talon => self.talon,
        }
    }

    /// Resting position of the card at `index` (0 = bottom) in `pile`.
    #[must_use]
    pub fn slot(&self, pile: PileId, index: usize) -> Position {
        let anchor = self.anchor(pile);
        let step = index as f32;
        let y = match pile.section() {
            Section::Tableau => anchor.y + step * self.fan_offset,
            _ => anchor.y,
        };
        Position::new(anchor.x, y, anchor.z - step * self.z_step)
    }
}
