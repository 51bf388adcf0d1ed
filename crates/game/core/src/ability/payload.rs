//! Ability payloads.
//!
//! A payload is the *what happens* half of an ability, expressed as a tagged
//! variant interpreted by the engine. Each variant implements a
//! `validate`/`execute` split: `validate` proves the payload can succeed
//! without mutating anything, `execute` performs the mutation. The executor
//! only charges costs after `execute` returns success, which keeps ability
//! use all-or-nothing.
//!
//! Movement payloads perform the grid move first and only then apply
//! secondary effects, because those effects read the unit's new position.

use crate::combat;
use crate::effect::{self, EffectCategory, EffectId};
use crate::env::{Env, compute_seed, roll};
use crate::hooks::GameEvent;
use crate::state::{CardinalDirection, GameState, Position, TurnFlags, UnitId};
use crate::turn::economy;

use super::executor::AbilityError;

/// The chosen target for one ability use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityTarget {
    Unit(UnitId),
    Cell(Position),
    Direction(CardinalDirection),
}

/// Chance-based status application riding on a damaging payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusProc {
    pub effect: EffectId,
    pub chance_pct: u32,
}

/// Tagged ability payload variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityPayload {
    /// Weapon damage scaled by `power_pct`, optionally applying a status.
    Strike {
        power_pct: u32,
        status: Option<StatusProc>,
    },

    /// Flat healing on the target.
    Heal { amount: i32 },

    /// Applies a status effect, attributed to the caster.
    GrantStatus { effect: EffectId },

    /// Removes every effect of a category from the target.
    Cleanse { category: EffectCategory },

    /// Grants action points, clamped to the target's maximum.
    Rally { action_points: i32 },

    /// Teleports the caster to an empty cell.
    Blink,

    /// Exchanges positions with an allied unit.
    SwapPlaces,

    /// Moves in a straight line to the farthest free cell, then strikes
    /// every hostile unit adjacent to the landing position.
    ChargeStrike { power_pct: u32 },
}

impl AbilityPayload {
    /// Proves the payload can succeed. Mutates nothing.
    pub fn validate(
        &self,
        state: &GameState,
        _env: &Env<'_>,
        caster: UnitId,
        target: &AbilityTarget,
        rule_range: u32,
    ) -> Result<(), AbilityError> {
        match self {
            Self::Strike { .. } | Self::Heal { .. } | Self::Cleanse { .. } | Self::Rally { .. } => {
                let AbilityTarget::Unit(target_id) = target else {
                    return Err(AbilityError::WrongTargetKind);
                };
                let unit = state
                    .units
                    .unit(*target_id)
                    .ok_or(AbilityError::TargetNotFound)?;
                if !unit.is_alive() {
                    return Err(AbilityError::TargetDefeated);
                }
                Ok(())
            }
            Self::GrantStatus { effect } => {
                let AbilityTarget::Unit(target_id) = target else {
                    return Err(AbilityError::WrongTargetKind);
                };
                let unit = state
                    .units
                    .unit(*target_id)
                    .ok_or(AbilityError::TargetNotFound)?;
                if !unit.is_alive() {
                    return Err(AbilityError::TargetDefeated);
                }
                // A full effect list only blocks genuinely new applications.
                if !unit.effects.has(*effect)
                    && unit.effects.len() == crate::config::GameConfig::MAX_STATUS_EFFECTS
                {
                    return Err(AbilityError::TargetEffectsFull);
                }
                Ok(())
            }
            Self::Blink => {
                let AbilityTarget::Cell(cell) = target else {
                    return Err(AbilityError::WrongTargetKind);
                };
                if !state.grid.is_valid_position(*cell) {
                    return Err(AbilityError::OutOfBounds);
                }
                if !state.grid.is_free(*cell) {
                    return Err(AbilityError::CellOccupied);
                }
                Ok(())
            }
            Self::SwapPlaces => {
                let AbilityTarget::Unit(target_id) = target else {
                    return Err(AbilityError::WrongTargetKind);
                };
                if *target_id == caster {
                    return Err(AbilityError::InvalidTarget);
                }
                let unit = state
                    .units
                    .unit(*target_id)
                    .ok_or(AbilityError::TargetNotFound)?;
                if !unit.is_alive() || unit.position.is_none() {
                    return Err(AbilityError::TargetDefeated);
                }
                Ok(())
            }
            Self::ChargeStrike { .. } => {
                let AbilityTarget::Direction(direction) = target else {
                    return Err(AbilityError::WrongTargetKind);
                };
                let landing = charge_landing(state, caster, *direction, rule_range)
                    .ok_or(AbilityError::NoPath)?;
                debug_assert!(state.grid.is_free(landing));
                Ok(())
            }
        }
    }

    /// Performs the payload. Callers must have validated first; execution
    /// re-derives only what it mutates.
    pub fn execute(
        &self,
        state: &mut GameState,
        env: &Env<'_>,
        caster: UnitId,
        target: &AbilityTarget,
        rule_range: u32,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), AbilityError> {
        match self {
            Self::Strike { power_pct, status } => {
                let AbilityTarget::Unit(target_id) = target else {
                    return Err(AbilityError::WrongTargetKind);
                };
                strike(state, env, caster, *target_id, *power_pct, events);
                if let Some(proc) = status
                    && state.units.unit(*target_id).is_some_and(|u| u.is_alive())
                {
                    let seed = compute_seed(state.game_seed, state.nonce, caster.0, roll::STATUS);
                    if env.rng_or_default().roll_d100(seed) <= proc.chance_pct {
                        let _ = effect::apply_effect(
                            state,
                            env,
                            *target_id,
                            proc.effect,
                            Some(caster),
                            events,
                        );
                    }
                }
                Ok(())
            }
            Self::Heal { amount } => {
                let AbilityTarget::Unit(target_id) = target else {
                    return Err(AbilityError::WrongTargetKind);
                };
                combat::apply_healing(state, env, *target_id, *amount, events);
                Ok(())
            }
            Self::GrantStatus { effect: id } => {
                let AbilityTarget::Unit(target_id) = target else {
                    return Err(AbilityError::WrongTargetKind);
                };
                effect::apply_effect(state, env, *target_id, *id, Some(caster), events)
                    .map_err(|_| AbilityError::TargetEffectsFull)?;
                Ok(())
            }
            Self::Cleanse { category } => {
                let AbilityTarget::Unit(target_id) = target else {
                    return Err(AbilityError::WrongTargetKind);
                };
                effect::clear_effects_by_category(state, env, *target_id, *category, events);
                Ok(())
            }
            Self::Rally { action_points } => {
                let AbilityTarget::Unit(target_id) = target else {
                    return Err(AbilityError::WrongTargetKind);
                };
                economy::grant_action_points(state, *target_id, *action_points, events);
                Ok(())
            }
            Self::Blink => {
                let AbilityTarget::Cell(cell) = target else {
                    return Err(AbilityError::WrongTargetKind);
                };
                relocate(state, env, caster, *cell, events).ok_or(AbilityError::CellOccupied)?;
                Ok(())
            }
            Self::SwapPlaces => {
                let AbilityTarget::Unit(target_id) = target else {
                    return Err(AbilityError::WrongTargetKind);
                };
                let caster_pos = state
                    .units
                    .unit(caster)
                    .and_then(|u| u.position)
                    .ok_or(AbilityError::CasterDefeated)?;
                let target_pos = state
                    .units
                    .unit(*target_id)
                    .and_then(|u| u.position)
                    .ok_or(AbilityError::TargetDefeated)?;
                if !state.grid.swap_units(caster, *target_id) {
                    return Err(AbilityError::InvalidTarget);
                }
                if let Some(unit) = state.units.unit_mut(caster) {
                    unit.position = Some(target_pos);
                    unit.flags.insert(TurnFlags::HAS_MOVED);
                }
                if let Some(unit) = state.units.unit_mut(*target_id) {
                    unit.position = Some(caster_pos);
                }
                events.push(GameEvent::UnitMoved {
                    unit: caster,
                    from: caster_pos,
                    to: target_pos,
                });
                events.push(GameEvent::UnitMoved {
                    unit: *target_id,
                    from: target_pos,
                    to: caster_pos,
                });
                Ok(())
            }
            Self::ChargeStrike { power_pct } => {
                let AbilityTarget::Direction(direction) = target else {
                    return Err(AbilityError::WrongTargetKind);
                };
                let landing = charge_landing(state, caster, *direction, rule_range)
                    .ok_or(AbilityError::NoPath)?;

                // Move first; the strike reads the new position.
                relocate(state, env, caster, landing, events).ok_or(AbilityError::NoPath)?;

                let hostile_neighbors: Vec<UnitId> = {
                    let caster_faction = state
                        .units
                        .unit(caster)
                        .map(|u| u.faction)
                        .ok_or(AbilityError::CasterNotFound)?;
                    state
                        .units
                        .living()
                        .filter(|unit| {
                            unit.faction.is_hostile_to(caster_faction)
                                && unit
                                    .position
                                    .is_some_and(|p| p.manhattan_distance(landing) == 1)
                        })
                        .map(|unit| unit.id)
                        .collect()
                };
                for target_id in hostile_neighbors {
                    strike(state, env, caster, target_id, *power_pct, events);
                }
                Ok(())
            }
        }
    }
}

/// Deals payload damage through the shared combat primitives: advantage and
/// jitter as a basic attack, scaled by `power_pct`, never below 1.
fn strike(
    state: &mut GameState,
    env: &Env<'_>,
    caster: UnitId,
    target_id: UnitId,
    power_pct: u32,
    events: &mut Vec<GameEvent>,
) {
    let params = env.combat_params();
    let Some((caster_state, target_state)) =
        state.units.unit(caster).zip(state.units.unit(target_id))
    else {
        return;
    };
    let advantage = env
        .tables_or_default()
        .advantage(caster_state.class, target_state.class);
    let jitter_seed = compute_seed(state.game_seed, state.nonce, caster.0, roll::JITTER);
    let jitter = combat::roll_jitter(env.rng_or_default(), jitter_seed, &params);
    let base = combat::calculate_damage_between(caster_state, target_state, advantage, jitter, &params);
    let damage = ((base as i64 * power_pct as i64) / 100).max(1) as i32;
    combat::apply_damage(state, env, Some(caster), target_id, damage, events);
}

/// Moves a unit, keeping grid occupancy and stored position in sync, and
/// firing the mover's on-move effect triggers.
fn relocate(
    state: &mut GameState,
    env: &Env<'_>,
    unit_id: UnitId,
    to: Position,
    events: &mut Vec<GameEvent>,
) -> Option<Position> {
    let from = state.units.unit(unit_id)?.position?;
    if !state.grid.move_unit(unit_id, to) {
        return None;
    }
    if let Some(unit) = state.units.unit_mut(unit_id) {
        unit.position = Some(to);
        unit.flags.insert(TurnFlags::HAS_MOVED);
    }
    events.push(GameEvent::UnitMoved {
        unit: unit_id,
        from,
        to,
    });
    effect::process_trigger(state, env, unit_id, effect::TriggerPhase::OnMove, events);
    Some(from)
}

/// Farthest free cell along a straight line from the caster, up to `range`
/// steps. `None` when even the first step is blocked or out of bounds.
fn charge_landing(
    state: &GameState,
    caster: UnitId,
    direction: CardinalDirection,
    range: u32,
) -> Option<Position> {
    let start = state.units.unit(caster)?.position?;
    let (dx, dy) = direction.offset();

    let mut landing = None;
    let mut cursor = start;
    for _ in 0..range {
        cursor = Position::new(cursor.x + dx, cursor.y + dy);
        if !state.grid.is_free(cursor) {
            break;
        }
        landing = Some(cursor);
    }
    landing
}
