//! Deterministic rules engine for a grid-based, turn-based tactics game.
//!
//! `tactics-core` defines the canonical rules (turn sequencing, status
//! effects, combat resolution, abilities) and exposes pure APIs that clients
//! and offline tools reuse. All state mutation flows through the
//! [`turn::TurnSequencer`], the combat resolver, the effect engine, and the
//! ability executor; collaborators (balance tables, catalogs, RNG,
//! presentation sinks, observers) are injected through [`env::Env`] and
//! degrade gracefully when absent.

pub mod ability;
pub mod combat;
pub mod config;
pub mod effect;
pub mod env;
pub mod error;
pub mod hooks;
pub mod movement;
pub mod state;
pub mod turn;

pub use ability::{
    AbilityDef, AbilityError, AbilityId, AbilityOracle, AbilityPayload, AbilityTag, AbilityTarget,
    BuiltinAbilities, StatusProc, TargetRule, can_use_ability, use_ability, valid_targets,
};
pub use combat::{
    AttackError, AttackOutcome, apply_damage, apply_direct_damage, apply_healing,
    calculate_damage, process_attack,
};
pub use config::GameConfig;
pub use effect::{
    ApplyOutcome, BuiltinEffects, EffectBehavior, EffectCategory, EffectError, EffectId,
    EffectOracle, EffectTemplate, TriggerPhase, apply_effect, clear_effects_by_category,
    process_trigger, remove_effect,
};
pub use env::{
    AnimationSink, CombatParams, DefaultTables, Env, NotificationSink, OracleError, PcgRng,
    RngOracle, TablesOracle, compute_seed,
};
pub use error::{ErrorSeverity, GameError};
pub use hooks::{GameEvent, Hook, HookCriticality, HookError, HookRegistry};
pub use movement::{MoveError, move_unit};
pub use state::{
    ActiveEffects, CardinalDirection, CombatLog, EffectInstance, Faction, GameOutcome, GameState,
    GridBounds, GridState, LogEntry, Phase, Position, ResourceCurrent, StatKind, TurnFlags,
    TurnHistory, TurnRecord, TurnState, UnitClass, UnitId, UnitState, UnitStats, UnitsState,
};
pub use turn::{TurnSequencer, calculate_initiative_order};
