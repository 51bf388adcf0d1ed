//! Turn and round bookkeeping.
//!
//! The initiative order is the authoritative acting sequence for the current
//! round. It is recomputed only at round boundaries; defeated units may
//! linger in a stale order and are skipped by the sequencer.

use std::collections::VecDeque;

use super::common::{Faction, UnitId};

/// Which side the acting unit belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    #[default]
    Player,
    Enemy,
}

impl From<Faction> for Phase {
    fn from(faction: Faction) -> Self {
        match faction {
            Faction::Enemy => Phase::Enemy,
            // Neutral units act during the player phase slot.
            Faction::Player | Faction::Neutral => Phase::Player,
        }
    }
}

/// Terminal result of an encounter. Latched once; never cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameOutcome {
    PlayerWin,
    EnemyWin,
    Draw,
}

/// A deferred turn transition.
///
/// Ending a turn does not run the next turn inline; it enqueues a transition
/// that the driving loop executes. This keeps multi-step cascades iterative
/// and lets a presentation layer pace them without wall-clock timers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PendingTransition {
    StartTurn,
    EndTurn,
}

/// Turn state for the round/turn state machine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Current phase, derived from the acting unit's faction.
    pub phase: Phase,

    /// Turn counter within the current round, reset at round boundaries.
    pub turn: u32,

    /// Round counter, starting at 1 once the encounter begins.
    pub round: u32,

    /// Acting order for the current round, player units first.
    pub initiative: Vec<UnitId>,

    /// Index of the acting unit within `initiative`.
    pub index: usize,

    /// Latched terminal outcome. Once set, no further transitions process.
    pub outcome: Option<GameOutcome>,

    /// Deferred transitions drained by the sequencer's drive loop.
    pub pending: VecDeque<PendingTransition>,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unit scheduled at the current initiative index, if the index is valid.
    pub fn current_unit(&self) -> Option<UnitId> {
        self.initiative.get(self.index).copied()
    }

    /// Returns true once a terminal outcome has been latched.
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }
}
