//! Ability legality checks, execution, and target enumeration.
//!
//! The executor handles cost/cooldown bookkeeping uniformly so payloads only
//! implement *what* happens, never *whether it's allowed*. Application is
//! all-or-nothing: a payload that fails its own validation charges nothing.

use crate::effect;
use crate::env::Env;
use crate::error::{ErrorSeverity, GameError};
use crate::hooks::GameEvent;
use crate::state::{GameState, Position, TurnFlags, UnitId};
use crate::turn::economy;

use super::def::{AbilityDef, AbilityId, TargetRule, builtin_def};
use super::payload::AbilityTarget;
use crate::state::CardinalDirection;

/// Reasons an ability use is rejected. All recoverable: nothing was mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityError {
    #[error("caster not found")]
    CasterNotFound,

    #[error("caster is defeated")]
    CasterDefeated,

    #[error("caster does not know this ability")]
    NotKnown,

    #[error("ability belongs to a different class")]
    WrongClass,

    #[error("caster cannot act")]
    ActionPrevented,

    #[error("an ability was already used this turn")]
    AlreadyUsedAbility,

    #[error("insufficient energy")]
    InsufficientEnergy,

    #[error("insufficient action points")]
    InsufficientActionPoints,

    #[error("ability is on cooldown")]
    OnCooldown,

    #[error("target kind does not match the ability")]
    WrongTargetKind,

    #[error("invalid target")]
    InvalidTarget,

    #[error("target not found")]
    TargetNotFound,

    #[error("target is defeated")]
    TargetDefeated,

    #[error("target faction does not match the ability")]
    WrongFaction,

    #[error("target cannot be targeted")]
    TargetUntargetable,

    #[error("target is out of range")]
    OutOfRange,

    #[error("position is out of bounds")]
    OutOfBounds,

    #[error("cell is occupied")]
    CellOccupied,

    #[error("target's effect list is full")]
    TargetEffectsFull,

    #[error("no valid path")]
    NoPath,

    #[error("the encounter is over")]
    GameOver,
}

impl GameError for AbilityError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CasterNotFound | Self::TargetNotFound => ErrorSeverity::Validation,
            Self::GameOver => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CasterNotFound => "ABILITY_CASTER_NOT_FOUND",
            Self::CasterDefeated => "ABILITY_CASTER_DEFEATED",
            Self::NotKnown => "ABILITY_NOT_KNOWN",
            Self::WrongClass => "ABILITY_WRONG_CLASS",
            Self::ActionPrevented => "ABILITY_ACTION_PREVENTED",
            Self::AlreadyUsedAbility => "ABILITY_ALREADY_USED",
            Self::InsufficientEnergy => "ABILITY_INSUFFICIENT_ENERGY",
            Self::InsufficientActionPoints => "ABILITY_INSUFFICIENT_ACTION_POINTS",
            Self::OnCooldown => "ABILITY_ON_COOLDOWN",
            Self::WrongTargetKind => "ABILITY_WRONG_TARGET_KIND",
            Self::InvalidTarget => "ABILITY_INVALID_TARGET",
            Self::TargetNotFound => "ABILITY_TARGET_NOT_FOUND",
            Self::TargetDefeated => "ABILITY_TARGET_DEFEATED",
            Self::WrongFaction => "ABILITY_WRONG_FACTION",
            Self::TargetUntargetable => "ABILITY_TARGET_UNTARGETABLE",
            Self::OutOfRange => "ABILITY_OUT_OF_RANGE",
            Self::OutOfBounds => "ABILITY_OUT_OF_BOUNDS",
            Self::CellOccupied => "ABILITY_CELL_OCCUPIED",
            Self::TargetEffectsFull => "ABILITY_TARGET_EFFECTS_FULL",
            Self::NoPath => "ABILITY_NO_PATH",
            Self::GameOver => "ABILITY_GAME_OVER",
        }
    }
}

/// Resolves an ability definition, preferring the catalog oracle and falling
/// back to the built-in catalog.
pub fn def_for(env: &Env<'_>, id: AbilityId) -> AbilityDef {
    env.abilities()
        .ok()
        .and_then(|catalog| catalog.definition(id))
        .unwrap_or_else(|| builtin_def(id))
}

/// Checks every precondition for an ability use without mutating anything.
///
/// Covers ownership, class, costs, cooldown, the one-ability-per-turn rule,
/// target-rule/faction/range matching, and the payload's own validation.
pub fn can_use_ability(
    state: &GameState,
    env: &Env<'_>,
    caster_id: UnitId,
    ability: AbilityId,
    target: &AbilityTarget,
) -> Result<(), AbilityError> {
    if state.turn.is_over() {
        return Err(AbilityError::GameOver);
    }

    let caster = state
        .units
        .unit(caster_id)
        .ok_or(AbilityError::CasterNotFound)?;
    if !caster.is_alive() {
        return Err(AbilityError::CasterDefeated);
    }
    if !caster.has_ability(ability) {
        return Err(AbilityError::NotKnown);
    }

    let def = def_for(env, ability);
    if let Some(class) = def.class
        && class != caster.class
    {
        return Err(AbilityError::WrongClass);
    }
    if effect::prevents_action(state, env, caster_id) {
        return Err(AbilityError::ActionPrevented);
    }
    if caster.flags.contains(TurnFlags::HAS_USED_ABILITY) {
        return Err(AbilityError::AlreadyUsedAbility);
    }
    if caster.resources.energy < def.energy_cost {
        return Err(AbilityError::InsufficientEnergy);
    }
    if caster.resources.action_points < def.action_point_cost {
        return Err(AbilityError::InsufficientActionPoints);
    }
    if !caster.cooldowns.is_ready(ability) {
        return Err(AbilityError::OnCooldown);
    }

    validate_target_rule(state, env, caster_id, &def.target, target)?;

    def.payload
        .validate(state, env, caster_id, target, def.target.range())
}

/// Validates the target against the ability's targeting rule.
fn validate_target_rule(
    state: &GameState,
    env: &Env<'_>,
    caster_id: UnitId,
    rule: &TargetRule,
    target: &AbilityTarget,
) -> Result<(), AbilityError> {
    let caster = state
        .units
        .unit(caster_id)
        .ok_or(AbilityError::CasterNotFound)?;

    match rule {
        TargetRule::SelfOnly => match target {
            AbilityTarget::Unit(id) if *id == caster_id => Ok(()),
            AbilityTarget::Unit(_) => Err(AbilityError::InvalidTarget),
            _ => Err(AbilityError::WrongTargetKind),
        },
        TargetRule::Ally { range } => {
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
            if unit.faction != caster.faction {
                return Err(AbilityError::WrongFaction);
            }
            check_range(state, caster_id, *target_id, *range)
        }
        TargetRule::Enemy { range } => {
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
            if !caster.faction.is_hostile_to(unit.faction) {
                return Err(AbilityError::WrongFaction);
            }
            if effect::blocks_enemy_targeting(state, env, *target_id) {
                return Err(AbilityError::TargetUntargetable);
            }
            check_range(state, caster_id, *target_id, *range)
        }
        TargetRule::Cell { range } => {
            let AbilityTarget::Cell(cell) = target else {
                return Err(AbilityError::WrongTargetKind);
            };
            if !state.grid.is_valid_position(*cell) {
                return Err(AbilityError::OutOfBounds);
            }
            let origin = caster.position.ok_or(AbilityError::CasterDefeated)?;
            if origin.manhattan_distance(*cell) > *range {
                return Err(AbilityError::OutOfRange);
            }
            Ok(())
        }
        TargetRule::Direction { .. } => match target {
            AbilityTarget::Direction(_) => Ok(()),
            _ => Err(AbilityError::WrongTargetKind),
        },
    }
}

fn check_range(
    state: &GameState,
    caster: UnitId,
    target: UnitId,
    range: u32,
) -> Result<(), AbilityError> {
    let distance = state
        .distance_between(caster, target)
        .ok_or(AbilityError::TargetNotFound)?;
    if distance > range {
        return Err(AbilityError::OutOfRange);
    }
    Ok(())
}

/// Re-validates and executes an ability.
///
/// Costs are deducted only after the payload succeeds: energy, cooldown, the
/// action-point spend through the sequencer's economy, and the
/// one-ability-per-turn flag. A payload failure leaves the caster untouched.
pub fn use_ability(
    state: &mut GameState,
    env: &Env<'_>,
    caster_id: UnitId,
    ability: AbilityId,
    target: &AbilityTarget,
    events: &mut Vec<GameEvent>,
) -> Result<(), AbilityError> {
    can_use_ability(state, env, caster_id, ability, target)?;

    let def = def_for(env, ability);
    state.nonce += 1;

    def.payload
        .execute(state, env, caster_id, target, def.target.range(), events)?;

    if let Some(caster) = state.units.unit_mut(caster_id) {
        caster.resources.energy -= def.energy_cost;
        caster.cooldowns.set(ability, def.cooldown);
        caster.flags.insert(TurnFlags::HAS_USED_ABILITY);
    }
    economy::spend_action_points(state, caster_id, def.action_point_cost, events);

    let name = state
        .units
        .unit(caster_id)
        .map(|u| u.name.clone())
        .unwrap_or_default();
    state.log_combat(format!("{name} uses {}", ability.name()));
    env.animate(ability.name(), caster_id, target_unit(target));
    events.push(GameEvent::AbilityUsed {
        unit: caster_id,
        ability_name: ability.name(),
    });
    Ok(())
}

fn target_unit(target: &AbilityTarget) -> Option<UnitId> {
    match target {
        AbilityTarget::Unit(id) => Some(*id),
        _ => None,
    }
}

/// Enumerates every target the caster could legally use the ability on.
///
/// Candidates are generated from the targeting rule and filtered through
/// [`can_use_ability`], so enumeration and validation agree exactly by
/// construction: anything returned here passes validation, and any passing
/// target of the right kind appears here.
pub fn valid_targets(
    state: &GameState,
    env: &Env<'_>,
    caster_id: UnitId,
    ability: AbilityId,
) -> Vec<AbilityTarget> {
    let def = def_for(env, ability);

    let candidates: Vec<AbilityTarget> = match def.target {
        TargetRule::SelfOnly => vec![AbilityTarget::Unit(caster_id)],
        TargetRule::Ally { .. } | TargetRule::Enemy { .. } => state
            .units
            .living()
            .map(|unit| AbilityTarget::Unit(unit.id))
            .collect(),
        TargetRule::Cell { range } => {
            let Some(origin) = state.units.unit(caster_id).and_then(|u| u.position) else {
                return Vec::new();
            };
            let bounds = state.grid.bounds();
            let range = range as i32;
            let mut cells = Vec::new();
            for dy in -range..=range {
                for dx in -range..=range {
                    if dx.abs() + dy.abs() > range {
                        continue;
                    }
                    let cell = Position::new(origin.x + dx, origin.y + dy);
                    if bounds.contains(cell) {
                        cells.push(AbilityTarget::Cell(cell));
                    }
                }
            }
            cells
        }
        TargetRule::Direction { .. } => CardinalDirection::ALL
            .iter()
            .map(|&direction| AbilityTarget::Direction(direction))
            .collect(),
    };

    candidates
        .into_iter()
        .filter(|target| can_use_ability(state, env, caster_id, ability, target).is_ok())
        .collect()
}
