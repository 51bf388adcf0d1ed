//! Ability catalog loader.
//!
//! Loads ability definitions from RON data files.

use std::collections::HashMap;

use anyhow::Context;
use tactics_core::{AbilityDef, AbilityId, AbilityOracle};

/// Registry for ability definitions.
///
/// Loads `AbilityDef` data from RON files and provides lookup by `AbilityId`
/// through the core's `AbilityOracle` trait.
#[derive(Debug, Clone)]
pub struct AbilityCatalog {
    definitions: HashMap<AbilityId, AbilityDef>,
}

impl AbilityCatalog {
    /// Loads all ability definitions from embedded RON data files.
    pub fn load() -> anyhow::Result<Self> {
        let mut definitions = HashMap::new();

        // Generic abilities shared by every class.
        let basic_ron = include_str!("../../data/abilities/basic.ron");
        let basic: Vec<AbilityDef> =
            ron::from_str(basic_ron).context("failed to parse abilities/basic.ron")?;
        for def in basic {
            definitions.insert(def.id, def);
        }

        // Class kits, including the ultimate variants.
        let class_ron = include_str!("../../data/abilities/class.ron");
        let class: Vec<AbilityDef> =
            ron::from_str(class_ron).context("failed to parse abilities/class.ron")?;
        for def in class {
            definitions.insert(def.id, def);
        }

        Ok(Self { definitions })
    }

    /// Returns the number of registered definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if no definitions are registered.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl AbilityOracle for AbilityCatalog {
    fn definition(&self, id: AbilityId) -> Option<AbilityDef> {
        self.definitions.get(&id).cloned()
    }

    fn catalog_ids(&self) -> Vec<AbilityId> {
        let mut ids: Vec<AbilityId> = self.definitions.keys().copied().collect();
        ids.sort_by_key(|id| id.name());
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{AbilityTag, TargetRule, UnitClass};

    #[test]
    fn loads_ability_definitions() {
        let catalog = AbilityCatalog::load().expect("failed to load ability catalog");

        assert!(catalog.len() >= 10, "should define the full shipped kit");

        let strike = catalog.definition(AbilityId::PowerStrike).unwrap();
        assert_eq!(strike.target, TargetRule::Enemy { range: 1 });
        assert!(strike.class.is_none());

        let charge = catalog.definition(AbilityId::Charge).unwrap();
        assert_eq!(charge.class, Some(UnitClass::Knight));
        assert!(matches!(charge.target, TargetRule::Direction { .. }));

        let annihilate = catalog.definition(AbilityId::Annihilate).unwrap();
        assert!(annihilate.tags.contains(&AbilityTag::Ultimate));
        assert!(annihilate.action_point_cost >= 2);
    }
}
