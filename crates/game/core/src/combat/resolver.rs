//! Attack resolution, damage application, and defeat handling.
//!
//! `process_attack` is the single entry point for basic attacks: it
//! validates, then resolves the fixed roll order miss → critical → counter →
//! status. Each draw mixes its own [`roll`] context into the seed, so the
//! draws are independent and individually forceable from tests.
//!
//! A rejected attack mutates nothing: `has_attacked` is only set, and action
//! points only spent, once every check has passed.

use crate::effect;
use crate::env::{Env, compute_seed, roll};
use crate::error::{ErrorSeverity, GameError};
use crate::hooks::GameEvent;
use crate::state::{GameOutcome, GameState, TurnFlags, UnitId};
use crate::turn::economy;

use super::damage::{calculate_damage, roll_jitter};

/// Errors rejecting an attack request. All recoverable: nothing was mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackError {
    #[error("attacker not found")]
    AttackerNotFound,

    #[error("target not found")]
    TargetNotFound,

    #[error("attacker is defeated")]
    AttackerDefeated,

    #[error("target is already defeated")]
    TargetDefeated,

    #[error("attacker has already attacked this turn")]
    AlreadyAttacked,

    #[error("cannot attack a unit of the same faction")]
    SameFaction,

    #[error("target is out of attack range")]
    OutOfRange,

    #[error("attacker cannot act")]
    ActionPrevented,

    #[error("target cannot be targeted")]
    TargetUntargetable,

    #[error("attacker is taunted toward {0}")]
    ForcedTargetElsewhere(UnitId),

    #[error("insufficient action points")]
    InsufficientActionPoints,

    #[error("the encounter is over")]
    GameOver,
}

impl GameError for AttackError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AttackerNotFound | Self::TargetNotFound => ErrorSeverity::Validation,
            Self::GameOver => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AttackerNotFound => "ATTACK_ATTACKER_NOT_FOUND",
            Self::TargetNotFound => "ATTACK_TARGET_NOT_FOUND",
            Self::AttackerDefeated => "ATTACK_ATTACKER_DEFEATED",
            Self::TargetDefeated => "ATTACK_TARGET_DEFEATED",
            Self::AlreadyAttacked => "ATTACK_ALREADY_ATTACKED",
            Self::SameFaction => "ATTACK_SAME_FACTION",
            Self::OutOfRange => "ATTACK_OUT_OF_RANGE",
            Self::ActionPrevented => "ATTACK_ACTION_PREVENTED",
            Self::TargetUntargetable => "ATTACK_TARGET_UNTARGETABLE",
            Self::ForcedTargetElsewhere(_) => "ATTACK_FORCED_TARGET_ELSEWHERE",
            Self::InsufficientActionPoints => "ATTACK_INSUFFICIENT_ACTION_POINTS",
            Self::GameOver => "ATTACK_GAME_OVER",
        }
    }
}

/// Numeric result of a resolved attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackOutcome {
    pub missed: bool,
    pub critical: bool,

    /// Damage dealt to the defender after modifiers (0 on a miss).
    pub damage: i32,

    /// Riposte damage dealt back to the attacker, if the counter roll
    /// passed and the defender survived.
    pub counter_damage: Option<i32>,

    /// Random negative effect applied to the defender, if the status roll
    /// passed.
    pub status_applied: Option<effect::EffectId>,

    pub defender_defeated: bool,
}

/// Validates and executes a basic attack.
///
/// Roll order is fixed: miss → critical → counter → status. The counter is
/// a reduced-damage riposte by a living defender, once per exchange (the
/// riposte itself can never be countered).
pub fn process_attack(
    state: &mut GameState,
    env: &Env<'_>,
    attacker_id: UnitId,
    defender_id: UnitId,
    events: &mut Vec<GameEvent>,
) -> Result<AttackOutcome, AttackError> {
    if state.turn.is_over() {
        return Err(AttackError::GameOver);
    }

    let attacker = state
        .units
        .unit(attacker_id)
        .ok_or(AttackError::AttackerNotFound)?;
    let defender = state
        .units
        .unit(defender_id)
        .ok_or(AttackError::TargetNotFound)?;

    if !attacker.is_alive() {
        return Err(AttackError::AttackerDefeated);
    }
    if !defender.is_alive() {
        return Err(AttackError::TargetDefeated);
    }
    if attacker.flags.contains(TurnFlags::HAS_ATTACKED) {
        return Err(AttackError::AlreadyAttacked);
    }
    if attacker.faction == defender.faction {
        return Err(AttackError::SameFaction);
    }

    let range = attacker.stats.attack_range.max(0) as u32;
    let distance = state
        .distance_between(attacker_id, defender_id)
        .ok_or(AttackError::TargetNotFound)?;
    if distance > range {
        return Err(AttackError::OutOfRange);
    }

    if effect::prevents_action(state, env, attacker_id) {
        return Err(AttackError::ActionPrevented);
    }
    let hostile = attacker.faction.is_hostile_to(defender.faction);
    if hostile && effect::blocks_enemy_targeting(state, env, defender_id) {
        return Err(AttackError::TargetUntargetable);
    }
    if let Some(required) = effect::forced_target(state, env, attacker_id)
        && required != defender_id
    {
        return Err(AttackError::ForcedTargetElsewhere(required));
    }

    // The acting unit pays one action point; off-turn ripostes and scripted
    // attacks are free.
    let is_current_actor = state.turn.current_unit() == Some(attacker_id);
    if is_current_actor {
        let affordable = state
            .units
            .unit(attacker_id)
            .is_some_and(|u| u.resources.action_points >= 1);
        if !affordable {
            return Err(AttackError::InsufficientActionPoints);
        }
    }

    // Snapshots taken before mutation; nothing past this point changes
    // stats or classes until damage lands.
    let attacker_class = attacker.class;
    let defender_class = defender.class;
    let attacker_stats = attacker.stats;
    let defender_stats = defender.stats;
    let attacker_name = attacker.name.clone();
    let defender_name = defender.name.clone();

    // Validation passed: from here on the attack is committed.
    state.nonce += 1;
    let nonce = state.nonce;

    if let Some(attacker) = state.units.unit_mut(attacker_id) {
        attacker.flags.insert(TurnFlags::HAS_ATTACKED);
    }
    if is_current_actor {
        economy::spend_action_points(state, attacker_id, 1, events);
    }

    let params = env.combat_params();
    let rng = env.rng_or_default();
    env.animate("attack", attacker_id, Some(defender_id));
    effect::process_trigger(state, env, defender_id, effect::TriggerPhase::OnTargeted, events);

    // Roll 1: miss.
    let miss_seed = compute_seed(state.game_seed, nonce, attacker_id.0, roll::MISS);
    if rng.roll_d100(miss_seed) <= params.miss_chance {
        state.log_combat(format!("{attacker_name} misses {defender_name}"));
        env.notify("Miss!", 800);
        let outcome = AttackOutcome {
            missed: true,
            critical: false,
            damage: 0,
            counter_damage: None,
            status_applied: None,
            defender_defeated: false,
        };
        events.push(GameEvent::AttackResolved {
            attacker: attacker_id,
            defender: defender_id,
            damage: 0,
            missed: true,
            critical: false,
        });
        return Ok(outcome);
    }

    // Roll 2: critical.
    let crit_seed = compute_seed(state.game_seed, nonce, attacker_id.0, roll::CRIT);
    let critical = rng.roll_d100(crit_seed) <= params.crit_chance;

    let advantage = env
        .tables_or_default()
        .advantage(attacker_class, defender_class);
    let jitter_seed = compute_seed(state.game_seed, nonce, attacker_id.0, roll::JITTER);
    let jitter = roll_jitter(rng, jitter_seed, &params);

    let mut damage = calculate_damage(&attacker_stats, &defender_stats, advantage, jitter, &params);
    if critical {
        damage = (damage as i64 * params.crit_damage_pct as i64 / 100) as i32;
        state.log_combat(format!("{attacker_name} lands a critical hit!"));
        env.notify("Critical hit!", 800);
    }

    let dealt = apply_damage(state, env, Some(attacker_id), defender_id, damage, events);
    effect::process_trigger(state, env, attacker_id, effect::TriggerPhase::OnAttack, events);

    // Roll 3: counter. The draw happens unconditionally to keep the roll
    // order fixed; the riposte only lands if the defender still stands.
    let counter_seed = compute_seed(state.game_seed, nonce, attacker_id.0, roll::COUNTER);
    let counter_rolled = rng.roll_d100(counter_seed) <= params.counter_chance;
    let mut counter_damage = None;
    let defender_alive = state.units.unit(defender_id).is_some_and(|u| u.is_alive());
    let attacker_alive = state.units.unit(attacker_id).is_some_and(|u| u.is_alive());
    if counter_rolled && defender_alive && attacker_alive {
        let riposte_jitter_seed =
            compute_seed(state.game_seed, nonce, defender_id.0, roll::COUNTER_JITTER);
        let riposte_jitter = roll_jitter(rng, riposte_jitter_seed, &params);
        let riposte_advantage = env
            .tables_or_default()
            .advantage(defender_class, attacker_class);
        let full = calculate_damage(
            &defender_stats,
            &attacker_stats,
            riposte_advantage,
            riposte_jitter,
            &params,
        );
        let reduced = ((full as i64 * params.counter_damage_pct as i64) / 100).max(1) as i32;
        state.log_combat(format!("{defender_name} counter-attacks {attacker_name}"));
        env.animate("counter", defender_id, Some(attacker_id));
        let dealt_back = apply_damage(state, env, Some(defender_id), attacker_id, reduced, events);
        counter_damage = Some(dealt_back);
    }

    // Roll 4: chance-based status application.
    let status_seed = compute_seed(state.game_seed, nonce, attacker_id.0, roll::STATUS);
    let status_rolled = rng.roll_d100(status_seed) <= params.status_chance;
    let mut status_applied = None;
    if status_rolled && state.units.unit(defender_id).is_some_and(|u| u.is_alive()) {
        status_applied = effect::apply_random_negative_effect(
            state,
            env,
            defender_id,
            Some(attacker_id),
            events,
        );
    }

    let defender_defeated = !state.units.unit(defender_id).is_some_and(|u| u.is_alive());
    events.push(GameEvent::AttackResolved {
        attacker: attacker_id,
        defender: defender_id,
        damage: dealt,
        missed: false,
        critical,
    });

    Ok(AttackOutcome {
        missed: false,
        critical,
        damage: dealt,
        counter_damage,
        status_applied,
        defender_defeated,
    })
}

/// Applies attacker-attributed damage through the shared health path.
///
/// Incoming-damage modifiers (shielded, marked) scale the amount before the
/// `max(0, hp - damage)` floor. Returns the damage actually dealt.
pub fn apply_damage(
    state: &mut GameState,
    env: &Env<'_>,
    source: Option<UnitId>,
    target_id: UnitId,
    amount: i32,
    events: &mut Vec<GameEvent>,
) -> i32 {
    let scaled = effect::incoming_damage_modifier(state, env, target_id, amount.max(0)).max(0);

    let Some(target) = state.units.unit_mut(target_id) else {
        return 0;
    };
    if !target.is_alive() {
        return 0;
    }

    let before = target.resources.hp;
    target.resources.hp = (before - scaled).max(0);
    let dealt = before - target.resources.hp;

    let name = unit_name(state, target_id);
    state.log_combat(format!("{name} takes {dealt} damage"));
    events.push(GameEvent::DamageApplied {
        unit: target_id,
        amount: dealt,
        source,
    });

    if state.units.unit(target_id).is_some_and(|u| !u.is_alive()) {
        handle_unit_defeat(state, env, source, target_id, events);
    } else {
        effect::process_trigger(state, env, target_id, effect::TriggerPhase::OnDamaged, events);
    }
    if let Some(source_id) = source {
        effect::process_trigger(state, env, source_id, effect::TriggerPhase::OnDamage, events);
    }

    dealt
}

/// Applies source-less damage (status effects, hazards) through the same
/// health path as attributed damage.
pub fn apply_direct_damage(
    state: &mut GameState,
    env: &Env<'_>,
    target_id: UnitId,
    amount: i32,
    events: &mut Vec<GameEvent>,
) -> i32 {
    apply_damage(state, env, None, target_id, amount, events)
}

/// Heals a unit, clamped so health never exceeds its maximum.
///
/// Returns the actual healing applied, which is never negative.
pub fn apply_healing(
    state: &mut GameState,
    _env: &Env<'_>,
    target_id: UnitId,
    amount: i32,
    events: &mut Vec<GameEvent>,
) -> i32 {
    let Some(target) = state.units.unit_mut(target_id) else {
        return 0;
    };
    if !target.is_alive() {
        return 0;
    }

    let missing = (target.stats.max_hp - target.resources.hp).max(0);
    let actual = amount.clamp(0, missing);
    target.resources.hp += actual;

    let name = unit_name(state, target_id);
    state.log_combat(format!("{name} recovers {actual} health"));
    events.push(GameEvent::HealingApplied {
        unit: target_id,
        amount: actual,
    });
    actual
}

/// Handles a unit reaching zero health. Runs exactly once per defeat: the
/// shared health path only calls this on the transition to zero.
///
/// Removes the unit from the grid, awards experience to a known attacker,
/// and latches the terminal outcome when a king-equivalent falls.
fn handle_unit_defeat(
    state: &mut GameState,
    env: &Env<'_>,
    attacker: Option<UnitId>,
    defeated_id: UnitId,
    events: &mut Vec<GameEvent>,
) {
    let Some(defeated) = state.units.unit(defeated_id) else {
        return;
    };
    let class = defeated.class;
    let faction = defeated.faction;
    let name = defeated.name.clone();

    let last_position = state.grid.remove_unit(defeated_id);
    if let Some(unit) = state.units.unit_mut(defeated_id) {
        unit.position = None;
    }

    state.log_combat(format!("{name} is defeated"));
    env.animate("defeat", defeated_id, None);
    env.notify(&format!("{name} falls!"), 1200);

    if let Some(attacker_id) = attacker
        && state.units.unit(attacker_id).is_some()
    {
        let award = env.tables_or_default().experience(class);
        if let Some(unit) = state.units.unit_mut(attacker_id) {
            unit.experience += award;
        }
        let attacker_name = unit_name(state, attacker_id);
        state.log_combat(format!("{attacker_name} gains {award} experience"));
    }

    events.push(GameEvent::UnitDefeated {
        unit: defeated_id,
        class,
        position: last_position,
        killer: attacker,
    });

    if class.is_king_equivalent()
        && state.turn.outcome.is_none()
        && let Some(winner) = faction.opponent()
    {
        let outcome = match winner {
            crate::state::Faction::Player => GameOutcome::PlayerWin,
            crate::state::Faction::Enemy => GameOutcome::EnemyWin,
            crate::state::Faction::Neutral => return,
        };
        state.turn.outcome = Some(outcome);
        state.log_combat("The king has fallen");
        events.push(GameEvent::GameOver { outcome });
    }
}

fn unit_name(state: &GameState, id: UnitId) -> String {
    state
        .units
        .unit(id)
        .map(|u| u.name.clone())
        .unwrap_or_else(|| id.to_string())
}
