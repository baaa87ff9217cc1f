//! Serializable table snapshots.
//!
//! A snapshot records pile membership, order and facing, nothing else: no
//! `waiting` flags, no transitions. Two tables with equal snapshots are
//! indistinguishable to the rules.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, Face};
use crate::core::error::SnapshotError;

use super::table::Table;

/// Pile contents bottom to top, indexed by `PileId`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub piles: Vec<Vec<(CardId, Face)>>,
}

impl TableSnapshot {
    /// Capture a table.
    #[must_use]
    pub fn capture(table: &Table) -> Self {
        let piles = table
            .piles()
            .iter()
            .map(|pile| {
                pile.cards()
                    .iter()
                    .map(|&card| (card, table.card(card).face))
                    .collect()
            })
            .collect();
        Self { piles }
    }

    /// Compact binary encoding for checkpoints.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a checkpoint produced by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reject snapshots that would break the one-card-per-identity invariant.
    fn validate(&self) -> Result<(), SnapshotError> {
        let mut seen = [false; crate::cards::DECK_SIZE];
        for pile in &self.piles {
            for &(card, _) in pile {
                let slot = seen
                    .get_mut(card.index())
                    .ok_or(SnapshotError::UnknownCard(card.0))?;
                if *slot {
                    return Err(SnapshotError::DuplicateCard(card.0));
                }
                *slot = true;
            }
        }
        if self.piles.len() != crate::piles::PILE_COUNT {
            return Err(SnapshotError::PileCount(self.piles.len()));
        }
        Ok(())
    }
}
