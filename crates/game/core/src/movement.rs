//! Basic movement.
//!
//! Moving is an action like attacking: gated by the per-turn flag, the
//! unit's move range, and one action point when the mover is the current
//! actor. All spatial mutation goes through [`GridState`] so logical and
//! spatial positions stay in sync.
//!
//! [`GridState`]: crate::state::GridState

use crate::effect::{self, TriggerPhase};
use crate::env::Env;
use crate::error::{ErrorSeverity, GameError};
use crate::hooks::GameEvent;
use crate::state::{GameState, Position, TurnFlags, UnitId};
use crate::turn::economy;

/// Reasons a move request is rejected. Nothing is mutated on rejection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error("unit not found")]
    UnitNotFound,

    #[error("unit is defeated")]
    UnitDefeated,

    #[error("unit has already moved this turn")]
    AlreadyMoved,

    #[error("unit cannot act")]
    ActionPrevented,

    #[error("destination is out of bounds")]
    OutOfBounds,

    #[error("destination is occupied")]
    Occupied,

    #[error("destination is beyond move range")]
    OutOfRange,

    #[error("insufficient action points")]
    InsufficientActionPoints,

    #[error("the encounter is over")]
    GameOver,
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnitNotFound => ErrorSeverity::Validation,
            Self::GameOver => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnitNotFound => "MOVE_UNIT_NOT_FOUND",
            Self::UnitDefeated => "MOVE_UNIT_DEFEATED",
            Self::AlreadyMoved => "MOVE_ALREADY_MOVED",
            Self::ActionPrevented => "MOVE_ACTION_PREVENTED",
            Self::OutOfBounds => "MOVE_OUT_OF_BOUNDS",
            Self::Occupied => "MOVE_OCCUPIED",
            Self::OutOfRange => "MOVE_OUT_OF_RANGE",
            Self::InsufficientActionPoints => "MOVE_INSUFFICIENT_ACTION_POINTS",
            Self::GameOver => "MOVE_GAME_OVER",
        }
    }
}

/// Validates and performs a basic move to `to`.
///
/// Distance is Manhattan against the unit's current move range (effect
/// deltas included). The acting unit pays one action point; scripted
/// off-turn moves are free.
pub fn move_unit(
    state: &mut GameState,
    env: &Env<'_>,
    unit_id: UnitId,
    to: Position,
    events: &mut Vec<GameEvent>,
) -> Result<(), MoveError> {
    if state.turn.is_over() {
        return Err(MoveError::GameOver);
    }

    let unit = state.units.unit(unit_id).ok_or(MoveError::UnitNotFound)?;
    if !unit.is_alive() {
        return Err(MoveError::UnitDefeated);
    }
    if unit.flags.contains(TurnFlags::HAS_MOVED) {
        return Err(MoveError::AlreadyMoved);
    }
    let from = unit.position.ok_or(MoveError::UnitDefeated)?;
    let range = unit.stats.move_range.max(0) as u32;

    if !state.grid.is_valid_position(to) {
        return Err(MoveError::OutOfBounds);
    }
    if state.grid.unit_at(to).is_some() {
        return Err(MoveError::Occupied);
    }
    if from.manhattan_distance(to) > range {
        return Err(MoveError::OutOfRange);
    }
    if effect::prevents_action(state, env, unit_id) {
        return Err(MoveError::ActionPrevented);
    }

    let is_current_actor = state.turn.current_unit() == Some(unit_id);
    if is_current_actor
        && !state
            .units
            .unit(unit_id)
            .is_some_and(|u| u.resources.action_points >= 1)
    {
        return Err(MoveError::InsufficientActionPoints);
    }

    // Validation passed: commit.
    state.nonce += 1;
    if is_current_actor {
        economy::spend_action_points(state, unit_id, 1, events);
    }

    state.grid.move_unit(unit_id, to);
    if let Some(unit) = state.units.unit_mut(unit_id) {
        unit.position = Some(to);
        unit.flags.insert(TurnFlags::HAS_MOVED);
    }
    events.push(GameEvent::UnitMoved {
        unit: unit_id,
        from,
        to,
    });
    env.animate("move", unit_id, None);

    effect::process_trigger(state, env, unit_id, TriggerPhase::OnMove, events);
    Ok(())
}
