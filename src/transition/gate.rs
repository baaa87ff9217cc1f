//! Per-card transition state machine.
//!
//! Every card is in exactly one of three motions:
//!
//! ```text
//! IDLE ──begin_translate──▶ TRANSLATING ──arrived──▶ IDLE
//! IDLE ──begin_flip───────▶ FLIPPING    ──finished─▶ IDLE
//! ```
//!
//! A card cannot start translating while it flips, or flip while it
//! translates. While any card is not idle the gate is busy, and the engine
//! refuses new requests.
//!
//! ## Completion
//!
//! The animation collaborator reports progress; the gate only judges it
//! during `tick`:
//! - a translation completes when the reported position is bit-identical
//!   to the target
//! - a flip completes once `finish_flip` has been called for it
//!
//! With `instant` set, translations snap to their target when they begin and
//! flips finish on the next tick, so a headless host needs no animator.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::{CardId, Face};
use crate::core::Position;
use crate::history::EventKind;

/// What a card is currently doing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum CardMotion {
    #[default]
    Idle,
    Translating {
        target: Position,
    },
    Flipping {
        to: Face,
    },
}

/// Instruction for the animation collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Cue {
    /// Animate `card` to `to`, then report arrival.
    Translate { card: CardId, to: Position },
    /// Animate `card` turning to `to`, then report the flip finished.
    Flip { card: CardId, to: Face },
    /// Stock and talon were recycled in one step; redraw both.
    Recycle { kind: EventKind },
}

/// A transition was requested for a card already in an exclusive motion.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
#[error("{card} is already {motion:?}")]
pub struct GateConflict {
    pub card: CardId,
    pub motion: CardMotion,
}

/// Per-card transition gate.
#[derive(Clone, Debug, Default)]
pub struct TransitionGate {
    /// Non-idle cards only.
    motions: FxHashMap<CardId, CardMotion>,
    /// Last known position of every card that has one.
    positions: FxHashMap<CardId, Position>,
    /// Flips the collaborator has reported done, pending the next tick.
    finished_flips: FxHashSet<CardId>,
    /// Cues not yet handed to the host.
    cues: Vec<Cue>,
    instant: bool,
}

impl TransitionGate {
    #[must_use]
    pub fn new(instant: bool) -> Self {
        Self {
            instant,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.instant
    }

    // === Queries ===

    #[must_use]
    pub fn motion(&self, card: CardId) -> CardMotion {
        self.motions.get(&card).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn is_idle(&self, card: CardId) -> bool {
        !self.motions.contains_key(&card)
    }

    /// Every card in the set is idle.
    #[must_use]
    pub fn all_idle(&self, cards: &[CardId]) -> bool {
        cards.iter().all(|&card| self.is_idle(card))
    }

    /// Any card at all is translating or flipping.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        !self.motions.is_empty()
    }

    /// Number of cards currently in motion.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.motions.len()
    }

    /// Last known position of a card.
    #[must_use]
    pub fn position(&self, card: CardId) -> Option<Position> {
        self.positions.get(&card).copied()
    }

    // === Transitions ===

    /// Set a card's position without animating it (dealing, recycling).
    pub fn place(&mut self, card: CardId, at: Position) {
        self.positions.insert(card, at);
    }

    /// Start moving a card to `target`.
    pub fn begin_translate(&mut self, card: CardId, target: Position) -> Result<(), GateConflict> {
        if let Some(&motion @ CardMotion::Flipping { .. }) = self.motions.get(&card) {
            return Err(GateConflict { card, motion });
        }
        if self.instant {
            self.positions.insert(card, target);
        }
        self.motions.insert(card, CardMotion::Translating { target });
        self.cues.push(Cue::Translate { card, to: target });
        Ok(())
    }

    /// Start turning a card to `to`.
    pub fn begin_flip(&mut self, card: CardId, to: Face) -> Result<(), GateConflict> {
        if let Some(&motion) = self.motions.get(&card) {
            return Err(GateConflict { card, motion });
        }
        self.finished_flips.remove(&card);
        self.motions.insert(card, CardMotion::Flipping { to });
        self.cues.push(Cue::Flip { card, to });
        Ok(())
    }

    /// Animation collaborator: a card's current position this frame.
    pub fn report_position(&mut self, card: CardId, at: Position) {
        self.positions.insert(card, at);
    }

    /// Animation collaborator: a flip has finished playing.
    pub fn finish_flip(&mut self, card: CardId) {
        if matches!(self.motions.get(&card), Some(CardMotion::Flipping { .. })) {
            self.finished_flips.insert(card);
        }
    }

    /// Complete every transition immediately, as if all animations had
    /// played out. Takes effect on the next `tick`.
    pub fn snap_all(&mut self) {
        for (&card, motion) in &self.motions {
            match *motion {
                CardMotion::Translating { target } => {
                    self.positions.insert(card, target);
                }
                CardMotion::Flipping { .. } => {
                    self.finished_flips.insert(card);
                }
                CardMotion::Idle => {}
            }
        }
    }

    /// Retire finished transitions. Returns how many cards became idle.
    pub fn tick(&mut self) -> usize {
        let before = self.motions.len();
        let positions = &self.positions;
        let finished = &self.finished_flips;
        let instant = self.instant;
        self.motions.retain(|card, motion| match *motion {
            CardMotion::Translating { target } => {
                !positions.get(card).is_some_and(|at| at.same_bits(&target))
            }
            CardMotion::Flipping { .. } => !(instant || finished.contains(card)),
            CardMotion::Idle => false,
        });
        let motions = &self.motions;
        self.finished_flips.retain(|card| motions.contains_key(card));

        let settled = before - self.motions.len();
        if settled > 0 {
            tracing::trace!(
                target: "klondike.gate",
                settled,
                active = self.motions.len(),
                "transitions settled",
            );
        }
        settled
    }

    // === Cues ===

    /// Queue a cue that has no per-card motion.
    pub fn announce(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    /// Hand all pending cues to the host.
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// Forget every motion, position and cue (new deal).
    pub fn clear(&mut self) {
        self.motions.clear();
        self.positions.clear();
        self.finished_flips.clear();
        self.cues.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    fn card(v: u8) -> CardId {
        CardId::from_parts(v, Suit::Hearts)
    }

    #[test]
    fn test_translate_completes_on_exact_arrival() {
        let mut gate = TransitionGate::new(false);
        let target = Position::new(1.0, 2.0, 0.0);
        gate.begin_translate(card(1), target).unwrap();
        assert!(gate.is_busy());

        gate.report_position(card(1), Position::new(1.0, 1.9999999, 0.0));
        assert_eq!(gate.tick(), 0);
        assert!(!gate.is_idle(card(1)));

        gate.report_position(card(1), target);
        assert_eq!(gate.tick(), 1);
        assert!(gate.is_idle(card(1)));
        assert!(!gate.is_busy());
    }

    #[test]
    fn test_multi_card_set_completes_together() {
        let mut gate = TransitionGate::new(false);
        let cards = [card(5), card(4), card(3)];
        for (i, &c) in cards.iter().enumerate() {
            gate.begin_translate(c, Position::new(0.0, -(i as f32), 0.0)).unwrap();
        }

        gate.report_position(cards[0], Position::new(0.0, 0.0, 0.0));
        gate.report_position(cards[1], Position::new(0.0, -1.0, 0.0));
        gate.tick();
        assert!(!gate.all_idle(&cards));

        gate.report_position(cards[2], Position::new(0.0, -2.0, 0.0));
        gate.tick();
        assert!(gate.all_idle(&cards));
    }

    #[test]
    fn test_flip_and_translate_are_exclusive() {
        let mut gate = TransitionGate::new(false);
        gate.begin_flip(card(2), Face::Up).unwrap();

        let err = gate.begin_translate(card(2), Position::default()).unwrap_err();
        assert_eq!(err.card, card(2));
        assert!(matches!(err.motion, CardMotion::Flipping { .. }));

        let mut gate = TransitionGate::new(false);
        gate.begin_translate(card(2), Position::default()).unwrap();
        assert!(gate.begin_flip(card(2), Face::Up).is_err());
    }

    #[test]
    fn test_flip_waits_for_finish_report() {
        let mut gate = TransitionGate::new(false);
        gate.begin_flip(card(7), Face::Up).unwrap();
        gate.tick();
        assert!(!gate.is_idle(card(7)));

        gate.finish_flip(card(7));
        gate.tick();
        assert!(gate.is_idle(card(7)));
    }

    #[test]
    fn test_instant_mode() {
        let mut gate = TransitionGate::new(true);
        let target = Position::new(3.0, 3.0, 0.0);
        gate.begin_translate(card(1), target).unwrap();
        gate.begin_flip(card(2), Face::Down).unwrap();

        assert_eq!(gate.position(card(1)), Some(target));
        assert_eq!(gate.tick(), 2);
        assert!(!gate.is_busy());
    }

    #[test]
    fn test_snap_all() {
        let mut gate = TransitionGate::new(false);
        gate.begin_translate(card(1), Position::new(9.0, 9.0, 0.0)).unwrap();
        gate.begin_flip(card(2), Face::Up).unwrap();

        gate.snap_all();
        gate.tick();
        assert!(!gate.is_busy());
    }

    #[test]
    fn test_cues_drain_in_order() {
        let mut gate = TransitionGate::new(false);
        gate.begin_translate(card(1), Position::default()).unwrap();
        gate.begin_flip(card(2), Face::Up).unwrap();
        gate.announce(Cue::Recycle { kind: EventKind::Replenish });

        let cues = gate.drain_cues();
        assert_eq!(cues.len(), 3);
        assert!(matches!(cues[0], Cue::Translate { .. }));
        assert!(matches!(cues[1], Cue::Flip { .. }));
        assert!(matches!(cues[2], Cue::Recycle { .. }));
        assert!(gate.drain_cues().is_empty());
    }
}
