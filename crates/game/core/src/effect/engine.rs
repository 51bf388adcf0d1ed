//! Status effect lifecycle and trigger dispatch.
//!
//! The engine owns the rules for application, stacking, refresh, expiry, and
//! the synchronous modifier queries the combat resolver consults. All state
//! mutation happens through unit state; templates come from the catalog
//! oracle with the built-in catalog as fallback, so effect application never
//! fails just because presentation wiring is absent.
//!
//! Catalog stability is an invariant: the template used to remove an effect
//! must match the one used to apply it, or stat restores would drift. Swap
//! catalogs between encounters, never during one.

use crate::env::{Env, compute_seed, roll};
use crate::error::{ErrorSeverity, GameError};
use crate::hooks::GameEvent;
use crate::state::{EffectInstance, GameState, UnitId};

use super::catalog::{BuiltinEffects, EffectOracle, builtin_template};
use super::template::{EffectBehavior, EffectCategory, EffectId, EffectTemplate, TriggerPhase};

/// Errors surfaced by effect application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectError {
    #[error("unit not found")]
    UnitNotFound,

    #[error("unit is defeated")]
    UnitDefeated,

    #[error("effect list is full")]
    EffectListFull,
}

impl GameError for EffectError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnitNotFound => ErrorSeverity::Validation,
            Self::UnitDefeated | Self::EffectListFull => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnitNotFound => "EFFECT_UNIT_NOT_FOUND",
            Self::UnitDefeated => "EFFECT_UNIT_DEFEATED",
            Self::EffectListFull => "EFFECT_LIST_FULL",
        }
    }
}

/// How an application resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A fresh instance was created and `on_apply` ran.
    Applied,

    /// An existing instance had its duration refreshed; `on_apply` did not
    /// re-run.
    Refreshed,

    /// A stackable effect gained a stack (the new total) and `on_apply` ran
    /// again to compound its magnitude.
    Stacked(u8),
}

/// Resolves the template for an effect id.
///
/// Prefers the catalog oracle; falls back to the built-in catalog so a
/// missing collaborator degrades instead of failing.
pub fn template_for(env: &Env<'_>, id: EffectId) -> EffectTemplate {
    env.effects()
        .ok()
        .and_then(|catalog| catalog.template(id))
        .unwrap_or_else(|| builtin_template(id))
}

/// Applies (or refreshes, or stacks) an effect on a unit.
///
/// A non-stackable effect already present refreshes its duration to the
/// template's full value without re-running `on_apply`. A stackable effect
/// under its limit gains a stack and re-runs `on_apply`; at the limit it
/// refreshes like a non-stackable one.
pub fn apply_effect(
    state: &mut GameState,
    env: &Env<'_>,
    unit_id: UnitId,
    effect_id: EffectId,
    source: Option<UnitId>,
    events: &mut Vec<GameEvent>,
) -> Result<ApplyOutcome, EffectError> {
    let template = template_for(env, effect_id);

    let unit = state.units.unit(unit_id).ok_or(EffectError::UnitNotFound)?;
    if !unit.is_alive() {
        return Err(EffectError::UnitDefeated);
    }

    if let Some(existing) = unit.effects.get(effect_id).copied() {
        let stacked = template.stackable && existing.stacks < template.stack_limit;
        let unit = state
            .units
            .unit_mut(unit_id)
            .ok_or(EffectError::UnitNotFound)?;
        let instance = unit
            .effects
            .get_mut(effect_id)
            .ok_or(EffectError::UnitNotFound)?;
        instance.remaining = template.duration;
        instance.source = source.or(instance.source);

        if !stacked {
            return Ok(ApplyOutcome::Refreshed);
        }

        instance.stacks += 1;
        let stacks = instance.stacks;
        run_on_apply(state, unit_id, &template);
        let name = state
            .units
            .unit(unit_id)
            .map(|u| u.name.clone())
            .unwrap_or_default();
        state.log_combat(format!("{name} suffers another stack of {effect_id} ({stacks})"));
        events.push(GameEvent::EffectApplied {
            unit: unit_id,
            effect_name: effect_id.name(),
        });
        return Ok(ApplyOutcome::Stacked(stacks));
    }

    let instance = EffectInstance {
        id: effect_id,
        remaining: template.duration,
        stacks: 1,
        source,
    };
    let unit = state
        .units
        .unit_mut(unit_id)
        .ok_or(EffectError::UnitNotFound)?;
    if !unit.effects.insert(instance) {
        return Err(EffectError::EffectListFull);
    }

    run_on_apply(state, unit_id, &template);
    let name = state
        .units
        .unit(unit_id)
        .map(|u| u.name.clone())
        .unwrap_or_default();
    state.log_combat(format!("{name} is now {effect_id}"));
    events.push(GameEvent::EffectApplied {
        unit: unit_id,
        effect_name: effect_id.name(),
    });
    Ok(ApplyOutcome::Applied)
}

/// Removes an effect, restoring its stat deltas.
///
/// Safe to call on a non-existent effect: returns false, mutates nothing.
pub fn remove_effect(
    state: &mut GameState,
    env: &Env<'_>,
    unit_id: UnitId,
    effect_id: EffectId,
    events: &mut Vec<GameEvent>,
) -> bool {
    let Some(unit) = state.units.unit_mut(unit_id) else {
        return false;
    };
    let Some(instance) = unit.effects.remove(effect_id) else {
        return false;
    };

    let template = template_for(env, effect_id);
    run_on_remove(state, unit_id, &template, instance.stacks);

    let name = state
        .units
        .unit(unit_id)
        .map(|u| u.name.clone())
        .unwrap_or_default();
    state.log_combat(format!("{name} is no longer {effect_id}"));
    events.push(GameEvent::EffectRemoved {
        unit: unit_id,
        effect_name: effect_id.name(),
    });
    true
}

/// Fires all effects on a unit whose trigger matches `phase`.
///
/// Effects fire in insertion order. Each firing runs periodic behaviors,
/// then decrements the remaining duration, removing the effect (and
/// restoring its deltas) at zero. Periodic damage can defeat the owner
/// mid-iteration; processing stops there.
pub fn process_trigger(
    state: &mut GameState,
    env: &Env<'_>,
    unit_id: UnitId,
    phase: TriggerPhase,
    events: &mut Vec<GameEvent>,
) {
    let Some(unit) = state.units.unit(unit_id) else {
        return;
    };
    if !unit.is_alive() {
        return;
    }

    let ids: Vec<EffectId> = unit.effects.ids().collect();
    for effect_id in ids {
        let template = template_for(env, effect_id);
        if template.trigger != phase {
            continue;
        }
        let Some(instance) = state
            .units
            .unit(unit_id)
            .and_then(|u| u.effects.get(effect_id))
            .copied()
        else {
            continue;
        };

        run_on_trigger(state, env, unit_id, &template, &instance, events);

        let expired = state
            .units
            .unit_mut(unit_id)
            .and_then(|u| u.effects.get_mut(effect_id))
            .map(|live| {
                live.remaining = live.remaining.saturating_sub(1);
                live.remaining == 0
            })
            .unwrap_or(false);
        if expired {
            remove_effect(state, env, unit_id, effect_id, events);
        }

        if !state.units.unit(unit_id).is_some_and(|u| u.is_alive()) {
            break;
        }
    }
}

/// Removes every effect of a category from a unit, restoring each one's
/// deltas. Returns how many were removed.
pub fn clear_effects_by_category(
    state: &mut GameState,
    env: &Env<'_>,
    unit_id: UnitId,
    category: EffectCategory,
    events: &mut Vec<GameEvent>,
) -> usize {
    let Some(unit) = state.units.unit(unit_id) else {
        return 0;
    };
    let matching: Vec<EffectId> = unit
        .effects
        .ids()
        .filter(|&id| template_for(env, id).category == category)
        .collect();

    let mut removed = 0;
    for effect_id in matching {
        if remove_effect(state, env, unit_id, effect_id, events) {
            removed += 1;
        }
    }
    removed
}

/// Applies a uniformly chosen negative effect from the catalog pool.
pub fn apply_random_negative_effect(
    state: &mut GameState,
    env: &Env<'_>,
    unit_id: UnitId,
    source: Option<UnitId>,
    events: &mut Vec<GameEvent>,
) -> Option<EffectId> {
    apply_random_from_category(state, env, unit_id, source, EffectCategory::Negative, events)
}

/// Applies a uniformly chosen positive effect from the catalog pool.
pub fn apply_random_positive_effect(
    state: &mut GameState,
    env: &Env<'_>,
    unit_id: UnitId,
    source: Option<UnitId>,
    events: &mut Vec<GameEvent>,
) -> Option<EffectId> {
    apply_random_from_category(state, env, unit_id, source, EffectCategory::Positive, events)
}

fn apply_random_from_category(
    state: &mut GameState,
    env: &Env<'_>,
    unit_id: UnitId,
    source: Option<UnitId>,
    category: EffectCategory,
    events: &mut Vec<GameEvent>,
) -> Option<EffectId> {
    let pool = match env.effects() {
        Ok(catalog) => catalog.ids_by_category(category),
        Err(_) => {
            tracing::debug!(target: "tactics::effect", "effect catalog missing, using builtin pool");
            BuiltinEffects.ids_by_category(category)
        }
    };
    if pool.is_empty() {
        return None;
    }

    let seed = compute_seed(state.game_seed, state.nonce, unit_id.0, roll::STATUS_PICK);
    let effect_id = pool[env.rng_or_default().pick(seed, pool.len())];

    apply_effect(state, env, unit_id, effect_id, source, events)
        .ok()
        .map(|_| effect_id)
}

// ============================================================================
// Synchronous modifier queries (consulted by the combat resolver)
// ============================================================================

/// Returns true if any active effect prevents the unit from acting.
pub fn prevents_action(state: &GameState, env: &Env<'_>, unit_id: UnitId) -> bool {
    let Some(unit) = state.units.unit(unit_id) else {
        return false;
    };
    unit.effects
        .ids()
        .any(|id| template_for(env, id).prevents_action)
}

/// Scales incoming damage through every damage-modifying effect on the
/// defender, in insertion order, before the minimum-damage floor.
pub fn incoming_damage_modifier(
    state: &GameState,
    env: &Env<'_>,
    unit_id: UnitId,
    amount: i32,
) -> i32 {
    let Some(unit) = state.units.unit(unit_id) else {
        return amount;
    };
    let mut scaled = amount as i64;
    for id in unit.effects.ids() {
        for behavior in &template_for(env, id).behaviors {
            if let EffectBehavior::IncomingDamageScale { numer, denom } = behavior {
                scaled = scaled * (*numer as i64) / (*denom as i64).max(1);
            }
        }
    }
    scaled as i32
}

/// Returns true if hostile units cannot target this unit.
pub fn blocks_enemy_targeting(state: &GameState, env: &Env<'_>, unit_id: UnitId) -> bool {
    let Some(unit) = state.units.unit(unit_id) else {
        return false;
    };
    unit.effects.ids().any(|id| {
        template_for(env, id)
            .behaviors
            .iter()
            .any(|b| matches!(b, EffectBehavior::BlockEnemyTargeting))
    })
}

/// The unit this unit is forced to attack, if a taunt-style effect with a
/// living source is active.
pub fn forced_target(state: &GameState, env: &Env<'_>, unit_id: UnitId) -> Option<UnitId> {
    let unit = state.units.unit(unit_id)?;
    for instance in unit.effects.iter() {
        let forces = template_for(env, instance.id)
            .behaviors
            .iter()
            .any(|b| matches!(b, EffectBehavior::ForceTargetingToSource));
        if !forces {
            continue;
        }
        if let Some(source) = instance.source
            && state.units.unit(source).is_some_and(|u| u.is_alive())
        {
            return Some(source);
        }
    }
    None
}

// ============================================================================
// Behavior interpreters
// ============================================================================

/// Applies one round of `on_apply` side effects (one stack's worth).
fn run_on_apply(state: &mut GameState, unit_id: UnitId, template: &EffectTemplate) {
    if let Some(unit) = state.units.unit_mut(unit_id) {
        for behavior in &template.behaviors {
            if let EffectBehavior::StatDelta { stat, delta } = behavior {
                unit.stats.apply_delta(*stat, *delta);
            }
        }
    }
}

/// Reverses `on_apply` side effects for every stack.
fn run_on_remove(state: &mut GameState, unit_id: UnitId, template: &EffectTemplate, stacks: u8) {
    if let Some(unit) = state.units.unit_mut(unit_id) {
        for behavior in &template.behaviors {
            if let EffectBehavior::StatDelta { stat, delta } = behavior {
                unit.stats.apply_delta(*stat, -delta * stacks as i32);
            }
        }
    }
}

/// Runs periodic behaviors for one trigger firing.
fn run_on_trigger(
    state: &mut GameState,
    env: &Env<'_>,
    unit_id: UnitId,
    template: &EffectTemplate,
    instance: &EffectInstance,
    events: &mut Vec<GameEvent>,
) {
    let stacks = instance.stacks as i32;
    for behavior in &template.behaviors {
        match behavior {
            EffectBehavior::PeriodicDamage { amount } => {
                let total = amount * stacks;
                let name = state
                    .units
                    .unit(unit_id)
                    .map(|u| u.name.clone())
                    .unwrap_or_default();
                state.log_combat(format!("{name} takes {total} damage from {}", template.id));
                crate::combat::apply_direct_damage(state, env, unit_id, total, events);
            }
            EffectBehavior::PeriodicHeal { amount } => {
                crate::combat::apply_healing(state, env, unit_id, amount * stacks, events);
            }
            _ => {}
        }
    }
}
