//! Unit state: stats, resources, per-turn flags, and cooldown bookkeeping.
//!
//! # Design Principles
//!
//! 1. **Stored stats are effective stats**: status effects mutate `stats`
//!    directly on apply and restore the exact delta on removal, so combat
//!    code never re-derives modifiers.
//! 2. **Current resources are clamped**: `hp` never drops below 0 or rises
//!    above `stats.max_hp`; the same holds for energy and action points.

use arrayvec::ArrayVec;

use super::common::{Faction, Position, UnitClass, UnitId};
use super::status::ActiveEffects;
use crate::ability::AbilityId;
use crate::config::GameConfig;

/// Core combat statistics for a unit.
///
/// All values are mutable integers: status effects may temporarily override
/// them and must restore them on removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitStats {
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub initiative: i32,
    pub move_range: i32,
    pub attack_range: i32,
    pub max_energy: i32,
    pub max_action_points: i32,
}

impl UnitStats {
    /// Applies a signed delta to one stat. Paired with an equal and opposite
    /// call when the owning effect is removed.
    pub fn apply_delta(&mut self, kind: StatKind, delta: i32) {
        let slot = match kind {
            StatKind::Attack => &mut self.attack,
            StatKind::Defense => &mut self.defense,
            StatKind::Initiative => &mut self.initiative,
            StatKind::MoveRange => &mut self.move_range,
            StatKind::AttackRange => &mut self.attack_range,
        };
        *slot += delta;
    }
}

impl Default for UnitStats {
    fn default() -> Self {
        Self {
            max_hp: 10,
            attack: 3,
            defense: 1,
            initiative: 0,
            move_range: 2,
            attack_range: 1,
            max_energy: 10,
            max_action_points: 2,
        }
    }
}

/// Mutable stats that status effects may target with temporary deltas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatKind {
    Attack,
    Defense,
    Initiative,
    MoveRange,
    AttackRange,
}

/// Current resource values (game state, must be stored).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceCurrent {
    pub hp: i32,
    pub energy: i32,
    pub action_points: i32,
}

impl ResourceCurrent {
    pub const fn new(hp: i32, energy: i32, action_points: i32) -> Self {
        Self {
            hp,
            energy,
            action_points,
        }
    }

    /// Create current resources at the maxima defined by `stats`.
    pub const fn at_max(stats: &UnitStats) -> Self {
        Self {
            hp: stats.max_hp,
            energy: stats.max_energy,
            action_points: stats.max_action_points,
        }
    }
}

bitflags::bitflags! {
    /// Per-turn action flags, reset at the owning unit's turn start.
    ///
    /// Serde support comes from the bitflags `serde` feature.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TurnFlags: u8 {
        const HAS_MOVED = 1 << 0;
        const HAS_ATTACKED = 1 << 1;
        const HAS_USED_ABILITY = 1 << 2;
    }
}

/// One ability's remaining cooldown, in the owning unit's turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownEntry {
    pub ability: AbilityId,
    pub remaining: u8,
}

/// Per-unit ability cooldown counters. Entries at zero are dropped, so the
/// list only holds abilities that are actually cooling down.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownTracker {
    entries: ArrayVec<CooldownEntry, { GameConfig::MAX_ABILITIES }>,
}

impl CooldownTracker {
    /// Remaining cooldown for an ability (0 if not cooling down).
    pub fn remaining(&self, ability: AbilityId) -> u8 {
        self.entries
            .iter()
            .find(|e| e.ability == ability)
            .map_or(0, |e| e.remaining)
    }

    /// Returns true if the ability is off cooldown.
    pub fn is_ready(&self, ability: AbilityId) -> bool {
        self.remaining(ability) == 0
    }

    /// Starts (or restarts) a cooldown. A zero duration is a no-op.
    pub fn set(&mut self, ability: AbilityId, turns: u8) {
        if turns == 0 {
            return;
        }
        if let Some(entry) = self.entries.iter_mut().find(|e| e.ability == ability) {
            entry.remaining = turns;
            return;
        }
        if !self.entries.is_full() {
            self.entries.push(CooldownEntry {
                ability,
                remaining: turns,
            });
        }
    }

    /// Decrements every nonzero cooldown by one, floored at zero.
    pub fn tick_down(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.remaining = entry.remaining.saturating_sub(1);
        }
        self.entries.retain(|e| e.remaining > 0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &CooldownEntry> {
        self.entries.iter()
    }
}

/// Complete state for one combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitState {
    pub id: UnitId,
    pub name: String,
    pub class: UnitClass,
    pub faction: Faction,

    /// Position on the grid. None means the unit is not on the grid
    /// (defeated and removed).
    pub position: Option<Position>,

    pub stats: UnitStats,
    pub resources: ResourceCurrent,

    /// Per-turn flags, reset by the sequencer at turn start.
    pub flags: TurnFlags,

    /// Active status effects keyed by effect id, insertion-ordered.
    pub effects: ActiveEffects,

    /// Abilities this unit knows.
    pub abilities: ArrayVec<AbilityId, { GameConfig::MAX_ABILITIES }>,

    /// Remaining cooldowns for known abilities.
    pub cooldowns: CooldownTracker,

    /// Experience accumulated from defeating other units.
    pub experience: u32,
}

impl UnitState {
    /// Create a new unit at full resources.
    pub fn new(
        id: UnitId,
        name: impl Into<String>,
        class: UnitClass,
        faction: Faction,
        position: Position,
        stats: UnitStats,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            class,
            faction,
            position: Some(position),
            stats,
            resources: ResourceCurrent::at_max(&stats),
            flags: TurnFlags::empty(),
            effects: ActiveEffects::default(),
            abilities: ArrayVec::new(),
            cooldowns: CooldownTracker::default(),
            experience: 0,
        }
    }

    /// Quick check that the unit can still participate in combat.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.resources.hp > 0
    }

    /// Returns true if this unit knows the given ability.
    pub fn has_ability(&self, ability: AbilityId) -> bool {
        self.abilities.contains(&ability)
    }

    /// Grants an ability, ignoring duplicates. Returns false when the
    /// ability list is full.
    pub fn learn_ability(&mut self, ability: AbilityId) -> bool {
        if self.abilities.contains(&ability) {
            return true;
        }
        if self.abilities.is_full() {
            return false;
        }
        self.abilities.push(ability);
        true
    }

    pub fn with_abilities(mut self, abilities: &[AbilityId]) -> Self {
        for &ability in abilities {
            self.learn_ability(ability);
        }
        self
    }

    pub fn with_initiative(mut self, initiative: i32) -> Self {
        self.stats.initiative = initiative;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldowns_tick_down_and_drop_at_zero() {
        let mut tracker = CooldownTracker::default();
        tracker.set(AbilityId::PowerStrike, 2);
        tracker.set(AbilityId::Purify, 1);

        assert_eq!(tracker.remaining(AbilityId::PowerStrike), 2);
        assert!(!tracker.is_ready(AbilityId::Purify));

        tracker.tick_down();
        assert_eq!(tracker.remaining(AbilityId::PowerStrike), 1);
        assert!(tracker.is_ready(AbilityId::Purify));

        tracker.tick_down();
        assert!(tracker.is_ready(AbilityId::PowerStrike));
        assert_eq!(tracker.iter().count(), 0);
    }

    #[test]
    fn stat_deltas_are_reversible() {
        let mut stats = UnitStats::default();
        let attack = stats.attack;

        stats.apply_delta(StatKind::Attack, -2);
        assert_eq!(stats.attack, attack - 2);

        stats.apply_delta(StatKind::Attack, 2);
        assert_eq!(stats.attack, attack);
    }
}
