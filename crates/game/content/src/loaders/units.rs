//! Unit archetype loader.
//!
//! Archetypes are the stat blocks and ability kits a room/encounter
//! generator spawns units from. The generator itself lives outside the
//! rules engine; this loader only supplies the data.

use anyhow::Context;
use serde::Deserialize;
use tactics_core::{AbilityId, Faction, GameState, Position, UnitClass, UnitId, UnitStats};

/// A spawnable unit archetype: class stat block plus ability kit.
#[derive(Clone, Debug, Deserialize)]
pub struct UnitArchetype {
    pub class: UnitClass,
    pub name: String,
    pub stats: UnitStats,
    pub abilities: Vec<AbilityId>,
}

impl UnitArchetype {
    /// Spawns a unit from this archetype into the given state.
    ///
    /// Returns `None` when the roster is full or the position unavailable,
    /// matching `GameState::spawn_unit`.
    pub fn spawn(
        &self,
        state: &mut GameState,
        faction: Faction,
        position: Position,
    ) -> Option<UnitId> {
        let id = state.spawn_unit(self.name.clone(), self.class, faction, position, self.stats)?;
        if let Some(unit) = state.units.unit_mut(id) {
            for &ability in &self.abilities {
                unit.learn_ability(ability);
            }
        }
        Some(id)
    }
}

/// Registry of the shipped unit archetypes, keyed by class.
#[derive(Clone, Debug)]
pub struct UnitArchetypes {
    archetypes: Vec<UnitArchetype>,
}

impl UnitArchetypes {
    /// Loads all archetypes from the embedded RON data file.
    pub fn load() -> anyhow::Result<Self> {
        let raw = include_str!("../../data/units.ron");
        let archetypes: Vec<UnitArchetype> =
            ron::from_str(raw).context("failed to parse units.ron")?;
        Ok(Self { archetypes })
    }

    /// First archetype of a class, if one is defined.
    pub fn archetype(&self, class: UnitClass) -> Option<&UnitArchetype> {
        self.archetypes.iter().find(|a| a.class == class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitArchetype> {
        self.archetypes.iter()
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_an_archetype_for_every_class() {
        let archetypes = UnitArchetypes::load().expect("failed to load unit archetypes");

        for class in [
            UnitClass::Pawn,
            UnitClass::Knight,
            UnitClass::Bishop,
            UnitClass::Rook,
            UnitClass::Queen,
            UnitClass::King,
        ] {
            let archetype = archetypes.archetype(class).unwrap();
            assert!(archetype.stats.max_hp > 0);
            assert!(!archetype.abilities.is_empty());
        }
    }

    #[test]
    fn archetypes_spawn_with_their_kit() {
        let archetypes = UnitArchetypes::load().unwrap();
        let mut state = GameState::default();

        let id = archetypes
            .archetype(UnitClass::Knight)
            .unwrap()
            .spawn(&mut state, Faction::Player, Position::new(0, 0))
            .unwrap();

        let unit = state.units.unit(id).unwrap();
        assert_eq!(unit.class, UnitClass::Knight);
        assert!(unit.has_ability(AbilityId::Charge));
    }
}
