//! Authoritative game state representation.
//!
//! This module owns the data structures that describe units, grid occupancy,
//! turn bookkeeping, and the bounded logs. Clients query this state but
//! mutate it exclusively through the sequencer, resolver, effect engine, and
//! ability executor.

pub mod common;
pub mod grid;
pub mod log;
pub mod status;
pub mod turn;
pub mod unit;
pub mod units;

pub use common::{CardinalDirection, Faction, Position, UnitClass, UnitId};
pub use grid::{GridBounds, GridState};
pub use log::{CombatLog, LogEntry, TurnHistory, TurnRecord};
pub use status::{ActiveEffects, EffectInstance};
pub use turn::{GameOutcome, PendingTransition, Phase, TurnState};
pub use unit::{
    CooldownEntry, CooldownTracker, ResourceCurrent, StatKind, TurnFlags, UnitState, UnitStats,
};
pub use units::UnitsState;

use crate::config::GameConfig;

/// Canonical snapshot of the deterministic game state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// RNG seed for deterministic random generation.
    ///
    /// Set once at encounter start and never modified. Combined with `nonce`
    /// to derive unique seeds for each random event.
    pub game_seed: u64,

    /// Action sequence number, incremented once per executed operation.
    pub nonce: u64,

    /// Sequential unit id allocator (monotonically increasing, never reused).
    next_unit_id: u32,

    /// All combatants, living and defeated.
    pub units: UnitsState,

    /// Grid occupancy. The single shared spatial resource.
    pub grid: GridState,

    /// Turn/round bookkeeping including the initiative order.
    pub turn: TurnState,

    /// Bounded combat message log.
    pub log: CombatLog,

    /// Rolling history of recent turns.
    pub history: TurnHistory,
}

impl GameState {
    /// Creates an empty state with the given grid bounds.
    pub fn new(bounds: GridBounds) -> Self {
        Self {
            game_seed: 0,
            nonce: 0,
            next_unit_id: 0,
            units: UnitsState::default(),
            grid: GridState::new(bounds),
            turn: TurnState::new(),
            log: CombatLog::default(),
            history: TurnHistory::default(),
        }
    }

    /// Creates an empty state with a specific RNG seed.
    pub fn with_seed(game_seed: u64, bounds: GridBounds) -> Self {
        Self {
            game_seed,
            ..Self::new(bounds)
        }
    }

    /// Allocates a new unique unit id.
    pub fn allocate_unit_id(&mut self) -> UnitId {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        id
    }

    /// Adds a unit to the roster and places it on the grid.
    ///
    /// Returns `None` when the roster is full or the position is occupied or
    /// out of bounds; nothing is mutated in that case.
    pub fn spawn_unit(
        &mut self,
        name: impl Into<String>,
        class: UnitClass,
        faction: Faction,
        position: Position,
        stats: UnitStats,
    ) -> Option<UnitId> {
        if !self.grid.is_free(position) {
            return None;
        }
        let id = self.allocate_unit_id();
        let unit = UnitState::new(id, name, class, faction, position, stats);
        if self.units.roster.push(unit).is_err() {
            return None;
        }
        self.grid.place_unit(id, position);
        Some(id)
    }

    /// Appends a combat log line stamped with the current turn and round.
    pub fn log_combat(&mut self, text: impl Into<String>) {
        let (turn, round) = (self.turn.turn, self.turn.round);
        self.log.push(text, turn, round);
    }

    /// Manhattan distance between two placed units.
    ///
    /// Returns `None` if either unit is missing or off the grid.
    pub fn distance_between(&self, a: UnitId, b: UnitId) -> Option<u32> {
        let pos_a = self.units.unit(a)?.position?;
        let pos_b = self.units.unit(b)?.position?;
        Some(pos_a.manhattan_distance(pos_b))
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GridBounds::new(
            GameConfig::DEFAULT_GRID_WIDTH,
            GameConfig::DEFAULT_GRID_HEIGHT,
        ))
    }
}
