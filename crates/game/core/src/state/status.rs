//! Per-unit status effect instances.
//!
//! Templates (duration, trigger phase, behaviors) live in the effect catalog;
//! this module stores only the live, mutable part attached to a unit.
//!
//! # Turn-based Duration
//!
//! Instances store `remaining` turns, decremented once per matching trigger
//! phase by the effect engine and removed at zero.

use arrayvec::ArrayVec;

use super::common::UnitId;
use crate::config::GameConfig;
use crate::effect::EffectId;

/// A live status effect attached to one unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectInstance {
    pub id: EffectId,

    /// Remaining duration in trigger ticks.
    pub remaining: u8,

    /// Number of stacks (1 for non-stackable effects).
    pub stacks: u8,

    /// Unit that applied this effect, used for attribution (taunt targets,
    /// reflected damage). Never owned; the source may die first.
    pub source: Option<UnitId>,
}

/// Active status effects on a unit, insertion-ordered.
///
/// At most one instance per effect id: re-applying a non-stackable effect
/// refreshes its duration, re-applying a stackable one under its limit
/// increments `stacks`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveEffects {
    effects: ArrayVec<EffectInstance, { GameConfig::MAX_STATUS_EFFECTS }>,
}

impl ActiveEffects {
    /// Checks if a specific effect is active.
    pub fn has(&self, id: EffectId) -> bool {
        self.effects.iter().any(|e| e.id == id)
    }

    /// Returns the instance for an effect id, if active.
    pub fn get(&self, id: EffectId) -> Option<&EffectInstance> {
        self.effects.iter().find(|e| e.id == id)
    }

    /// Mutable access to the instance for an effect id, if active.
    pub fn get_mut(&mut self, id: EffectId) -> Option<&mut EffectInstance> {
        self.effects.iter_mut().find(|e| e.id == id)
    }

    /// Inserts a fresh instance. Returns false when the effect list is full;
    /// callers treat that as an application failure, not a panic.
    pub fn insert(&mut self, instance: EffectInstance) -> bool {
        if self.effects.is_full() {
            return false;
        }
        self.effects.push(instance);
        true
    }

    /// Removes an effect instance, returning it if it was present.
    pub fn remove(&mut self, id: EffectId) -> Option<EffectInstance> {
        let index = self.effects.iter().position(|e| e.id == id)?;
        Some(self.effects.remove(index))
    }

    /// Iterates instances in insertion order (the trigger dispatch order).
    pub fn iter(&self) -> impl Iterator<Item = &EffectInstance> {
        self.effects.iter()
    }

    /// Effect ids in insertion order. Used by the trigger loop, which needs
    /// to re-look-up instances across mutations.
    pub fn ids(&self) -> impl Iterator<Item = EffectId> + '_ {
        self.effects.iter().map(|e| e.id)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
