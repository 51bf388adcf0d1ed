//! Damage calculation.

use crate::env::{CombatParams, RngOracle};
use crate::state::{UnitState, UnitStats};

/// Calculate damage from an attack.
///
/// # Formula
///
/// ```text
/// base = attacker.attack
/// reduced = base * pivot / (defense + pivot)      // diminishing curve
/// scaled = reduced * advantage / 1000             // class matchup
/// jittered = scaled * jitter_pct / 100            // bounded variance
/// final = max(jittered, minimum)
/// ```
///
/// Integer division floors at each step. Defense has asymptotically
/// diminishing returns and never fully nullifies damage; the result is
/// monotonically non-decreasing in attack and non-increasing in defense for
/// a fixed jitter roll.
///
/// # Arguments
///
/// * `attacker_stats` / `defender_stats` - effective stats (effect deltas
///   already included)
/// * `advantage_permille` - class matchup multiplier, 1000 = neutral
/// * `jitter_pct` - rolled percentage, 100 = no variance
/// * `params` - balance parameters from the tables oracle
pub fn calculate_damage(
    attacker_stats: &UnitStats,
    defender_stats: &UnitStats,
    advantage_permille: u32,
    jitter_pct: u32,
    params: &CombatParams,
) -> i32 {
    let base = attacker_stats.attack.max(0) as i64;
    let pivot = params.defense_pivot.max(1) as i64;
    let defense = defender_stats.defense.max(0) as i64;

    let reduced = base * pivot / (defense + pivot);
    let scaled = reduced * advantage_permille as i64 / 1000;
    let jittered = scaled * jitter_pct as i64 / 100;

    jittered.max(params.minimum_damage as i64) as i32
}

/// Convenience wrapper taking full unit states.
pub fn calculate_damage_between(
    attacker: &UnitState,
    defender: &UnitState,
    advantage_permille: u32,
    jitter_pct: u32,
    params: &CombatParams,
) -> i32 {
    calculate_damage(
        &attacker.stats,
        &defender.stats,
        advantage_permille,
        jitter_pct,
        params,
    )
}

/// Rolls the damage jitter percentage in `[100 - jitter, 100 + jitter]`.
pub fn roll_jitter(rng: &dyn RngOracle, seed: u64, params: &CombatParams) -> u32 {
    let jitter = params.jitter_pct.min(100);
    rng.range(seed, 100 - jitter, 100 + jitter)
}
