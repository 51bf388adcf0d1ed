use bounded_vector::BoundedVec;

use super::common::{Faction, UnitId};
use super::unit::UnitState;
use crate::config::GameConfig;

/// Aggregate state for every unit in the encounter.
///
/// Defeated units stay in the roster (with `position: None` and zero hp) so
/// logs and experience attribution can still resolve them; spatial and
/// initiative bookkeeping drop them instead.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitsState {
    pub roster: BoundedVec<UnitState, 0, { GameConfig::MAX_UNITS }>,
}

impl UnitsState {
    /// Returns a reference to a unit by id.
    pub fn unit(&self, id: UnitId) -> Option<&UnitState> {
        self.roster.iter().find(|unit| unit.id == id)
    }

    /// Returns a mutable reference to a unit by id.
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut UnitState> {
        self.roster.iter_mut().find(|unit| unit.id == id)
    }

    /// Iterates all units, living or defeated.
    pub fn all(&self) -> impl Iterator<Item = &UnitState> {
        self.roster.iter()
    }

    /// Iterates living units only.
    pub fn living(&self) -> impl Iterator<Item = &UnitState> {
        self.roster.iter().filter(|unit| unit.is_alive())
    }

    /// Counts living units belonging to a faction.
    pub fn living_count(&self, faction: Faction) -> usize {
        self.living().filter(|unit| unit.faction == faction).count()
    }
}
