//! Balance tables loader.
//!
//! Loads combat parameters, the class advantage matrix, and experience
//! awards from a TOML data file.

use std::collections::HashMap;

use anyhow::Context;
use serde::Deserialize;
use tactics_core::{CombatParams, DefaultTables, TablesOracle, UnitClass};

/// One directed entry of the class advantage matrix.
#[derive(Clone, Copy, Debug, Deserialize)]
struct AdvantageEntry {
    attacker: UnitClass,
    defender: UnitClass,
    permille: u32,
}

/// Raw on-disk shape of `tables.toml`.
#[derive(Debug, Deserialize)]
struct TablesData {
    combat: CombatParams,
    advantage: Vec<AdvantageEntry>,
    experience: HashMap<UnitClass, u32>,
}

/// Balance tables backed by TOML data, implementing the core's
/// `TablesOracle`. Pairings and classes missing from the data fall back to
/// the built-in defaults.
#[derive(Debug, Clone)]
pub struct BalanceTables {
    combat: CombatParams,
    advantage: HashMap<(UnitClass, UnitClass), u32>,
    experience: HashMap<UnitClass, u32>,
}

impl BalanceTables {
    /// Loads the balance tables from the embedded TOML data file.
    pub fn load() -> anyhow::Result<Self> {
        let raw = include_str!("../../data/tables.toml");
        let data: TablesData = toml::from_str(raw).context("failed to parse tables.toml")?;

        let advantage = data
            .advantage
            .iter()
            .map(|entry| ((entry.attacker, entry.defender), entry.permille))
            .collect();

        Ok(Self {
            combat: data.combat,
            advantage,
            experience: data.experience,
        })
    }
}

impl TablesOracle for BalanceTables {
    fn combat(&self) -> CombatParams {
        self.combat
    }

    fn advantage(&self, attacker: UnitClass, defender: UnitClass) -> u32 {
        self.advantage
            .get(&(attacker, defender))
            .copied()
            .unwrap_or(1000)
    }

    fn experience(&self, class: UnitClass) -> u32 {
        self.experience
            .get(&class)
            .copied()
            .unwrap_or_else(|| DefaultTables.experience(class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_balance_tables() {
        let tables = BalanceTables::load().expect("failed to load balance tables");

        let params = tables.combat();
        assert_eq!(params.defense_pivot, 20);
        assert!(params.jitter_pct <= 100);

        // The matrix stays asymmetric in data form.
        assert_ne!(
            tables.advantage(UnitClass::Queen, UnitClass::King),
            tables.advantage(UnitClass::King, UnitClass::Queen)
        );
        // Unlisted pairings are neutral.
        assert_eq!(
            tables.advantage(UnitClass::Generic, UnitClass::Generic),
            1000
        );

        assert_eq!(tables.experience(UnitClass::King), 100);
    }
}
