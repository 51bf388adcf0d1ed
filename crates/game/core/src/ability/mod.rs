//! Ability executor.
//!
//! Catalog definitions, legality checks, targeting enumeration, and uniform
//! cost/cooldown accounting for everything beyond basic move/attack.

mod def;
mod executor;
mod payload;

pub use def::{
    AbilityDef, AbilityId, AbilityOracle, AbilityTag, BuiltinAbilities, TargetRule, builtin_def,
};
pub use executor::{AbilityError, can_use_ability, def_for, use_ability, valid_targets};
pub use payload::{AbilityPayload, AbilityTarget, StatusProc};
