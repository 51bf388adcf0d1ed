//! Status effect catalog loader.
//!
//! Loads effect templates from RON data files.

use std::collections::HashMap;

use anyhow::Context;
use tactics_core::{EffectId, EffectOracle, EffectTemplate};

/// Registry for status effect templates.
///
/// Loads `EffectTemplate` data from RON and provides lookup by `EffectId`
/// through the core's `EffectOracle` trait.
#[derive(Debug, Clone)]
pub struct EffectCatalog {
    templates: HashMap<EffectId, EffectTemplate>,
}

impl EffectCatalog {
    /// Loads all effect templates from the embedded RON data file.
    pub fn load() -> anyhow::Result<Self> {
        let mut templates = HashMap::new();

        let effects_ron = include_str!("../../data/effects/effects.ron");
        let parsed: Vec<EffectTemplate> =
            ron::from_str(effects_ron).context("failed to parse effects.ron")?;
        for template in parsed {
            templates.insert(template.id, template);
        }

        Ok(Self { templates })
    }

    /// Returns the number of registered templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true if no templates are registered.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl EffectOracle for EffectCatalog {
    fn template(&self, id: EffectId) -> Option<EffectTemplate> {
        self.templates.get(&id).cloned()
    }

    fn catalog_ids(&self) -> Vec<EffectId> {
        let mut ids: Vec<EffectId> = self.templates.keys().copied().collect();
        ids.sort_by_key(|id| id.name());
        ids
    }
}
