//! Oracle providing game rules and balance tables.

use crate::state::UnitClass;

/// Oracle providing combat balance parameters and class tables.
///
/// This oracle defines core gameplay numbers: the damage curve pivot, roll
/// chances, the class-vs-class advantage table, and experience awards. It
/// does NOT define unit data or catalogs (use the effect/ability oracles for
/// those).
pub trait TablesOracle: Send + Sync {
    fn combat(&self) -> CombatParams;

    /// Damage multiplier for `attacker` class hitting `defender` class, in
    /// per-mille (1000 = neutral). The table is asymmetric: queen-into-king
    /// and king-into-queen carry different multipliers.
    fn advantage(&self, attacker: UnitClass, defender: UnitClass) -> u32;

    /// Experience awarded for defeating a unit of the given class.
    fn experience(&self, class: UnitClass) -> u32;
}

/// Combat roll and formula parameters.
///
/// All chances are percentages (0-100); scaling factors are percentages of
/// the base value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatParams {
    /// Pivot of the diminishing defense curve: `damage * pivot / (defense + pivot)`.
    /// Defense approaches but never reaches full mitigation.
    pub defense_pivot: u32,

    /// Damage jitter half-width in percent (20 = roll within ±20%).
    pub jitter_pct: u32,

    /// Minimum damage after all reductions.
    pub minimum_damage: u32,

    /// Chance for an attack to miss outright.
    pub miss_chance: u32,

    /// Chance for a non-missed attack to crit.
    pub crit_chance: u32,

    /// Critical damage as a percentage of the rolled damage.
    pub crit_damage_pct: u32,

    /// Chance for the defender to riposte after a non-missed attack.
    pub counter_chance: u32,

    /// Riposte damage as a percentage of a fresh damage roll.
    pub counter_damage_pct: u32,

    /// Chance for an attack to apply a random negative status effect.
    pub status_chance: u32,

    /// Energy regained by the acting unit at its turn start.
    pub energy_regen: i32,
}

impl Default for CombatParams {
    fn default() -> Self {
        Self {
            defense_pivot: 20,
            jitter_pct: 20,
            minimum_damage: 1,
            miss_chance: 10,
            crit_chance: 10,
            crit_damage_pct: 150,
            counter_chance: 20,
            counter_damage_pct: 70,
            status_chance: 15,
            energy_regen: 2,
        }
    }
}

/// Built-in balance tables. `tactics-content` can override every number from
/// data files; this implementation keeps the engine usable headless.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultTables;

impl TablesOracle for DefaultTables {
    fn combat(&self) -> CombatParams {
        CombatParams::default()
    }

    fn advantage(&self, attacker: UnitClass, defender: UnitClass) -> u32 {
        use UnitClass::*;
        // Asymmetric per-mille table. Unlisted pairings are neutral.
        match (attacker, defender) {
            (Queen, King) => 1250,
            (King, Queen) => 900,
            (Knight, Pawn) => 1200,
            (Pawn, Knight) => 900,
            (Rook, Bishop) => 1150,
            (Bishop, Rook) => 950,
            (Bishop, Knight) => 1100,
            (Knight, Rook) => 1100,
            (Pawn, Queen) => 800,
            (Queen, Pawn) => 1100,
            _ => 1000,
        }
    }

    fn experience(&self, class: UnitClass) -> u32 {
        use UnitClass::*;
        match class {
            Pawn => 10,
            Knight => 25,
            Bishop => 25,
            Rook => 40,
            Queen => 75,
            King => 100,
            Generic => 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advantage_table_is_asymmetric() {
        let tables = DefaultTables;
        assert_ne!(
            tables.advantage(UnitClass::Queen, UnitClass::King),
            tables.advantage(UnitClass::King, UnitClass::Queen)
        );
        assert_eq!(
            tables.advantage(UnitClass::Generic, UnitClass::Generic),
            1000
        );
    }
}
