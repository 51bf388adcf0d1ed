//! Ability catalog definitions.
//!
//! An [`AbilityDef`] is a catalog entry, not per-unit state: costs, cooldown
//! length, targeting rule, owning class, and the payload. Per-unit cooldown
//! counters live on the unit. Special/ultimate attacks are ordinary entries
//! with heavier costs and the `Ultimate` tag; they share all validation.

use super::payload::{AbilityPayload, StatusProc};
use crate::effect::{EffectCategory, EffectId};
use crate::state::UnitClass;

/// Canonical ability identifier. All lookup goes through this enum; data
/// files resolve names to ids once at load time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AbilityId {
    PowerStrike,
    FirstAid,
    Blink,
    SwapPlaces,
    Advance,
    Charge,
    Mend,
    Purify,
    Bulwark,
    Taunt,
    Fireball,
    Annihilate,
    RoyalRally,
}

impl AbilityId {
    /// Static display name for logs and events.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PowerStrike => "Power Strike",
            Self::FirstAid => "First Aid",
            Self::Blink => "Blink",
            Self::SwapPlaces => "Swap Places",
            Self::Advance => "Advance",
            Self::Charge => "Charge",
            Self::Mend => "Mend",
            Self::Purify => "Purify",
            Self::Bulwark => "Bulwark",
            Self::Taunt => "Taunt",
            Self::Fireball => "Fireball",
            Self::Annihilate => "Annihilate",
            Self::RoyalRally => "Royal Rally",
        }
    }
}

/// How an ability selects its target. Ranges are Manhattan distances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetRule {
    /// The caster itself.
    SelfOnly,

    /// A living unit of the caster's faction within range.
    Ally { range: u32 },

    /// A living unit of the opposing faction within range.
    Enemy { range: u32 },

    /// A grid cell within range.
    Cell { range: u32 },

    /// A cardinal direction, with movement/effect reach up to `range`.
    Direction { range: u32 },
}

impl TargetRule {
    /// Maximum Manhattan range of the rule (0 for self-targeting).
    pub const fn range(&self) -> u32 {
        match self {
            Self::SelfOnly => 0,
            Self::Ally { range }
            | Self::Enemy { range }
            | Self::Cell { range }
            | Self::Direction { range } => *range,
        }
    }
}

/// Tags for gameplay logic (AI weighting, UI grouping).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityTag {
    Attack,
    Support,
    Movement,
    Ultimate,
}

/// Complete specification for an ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDef {
    pub id: AbilityId,
    pub description: String,

    pub energy_cost: i32,
    pub action_point_cost: i32,

    /// Cooldown in the owner's turns after a successful use.
    pub cooldown: u8,

    pub target: TargetRule,

    /// Owning class; `None` means generic/shared.
    pub class: Option<UnitClass>,

    pub tags: Vec<AbilityTag>,

    pub payload: AbilityPayload,
}

/// Oracle providing ability definitions.
///
/// `tactics-content` implements this over RON data; [`BuiltinAbilities`]
/// keeps the engine usable headless with the same ids.
pub trait AbilityOracle: Send + Sync {
    /// Definition for an ability id. `None` if the catalog omits it.
    fn definition(&self, id: AbilityId) -> Option<AbilityDef>;

    /// Every ability id the catalog defines.
    fn catalog_ids(&self) -> Vec<AbilityId>;
}

/// Built-in ability definitions mirroring the shipped catalog.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinAbilities;

impl AbilityOracle for BuiltinAbilities {
    fn definition(&self, id: AbilityId) -> Option<AbilityDef> {
        Some(builtin_def(id))
    }

    fn catalog_ids(&self) -> Vec<AbilityId> {
        use strum::IntoEnumIterator;
        AbilityId::iter().collect()
    }
}

/// Built-in definition for an ability id. Defined for every id, making this
/// the universal fallback when no catalog oracle is wired.
pub fn builtin_def(id: AbilityId) -> AbilityDef {
    match id {
        AbilityId::PowerStrike => AbilityDef {
            id,
            description: "A heavy blow dealing half again normal damage.".into(),
            energy_cost: 3,
            action_point_cost: 1,
            cooldown: 2,
            target: TargetRule::Enemy { range: 1 },
            class: None,
            tags: vec![AbilityTag::Attack],
            payload: AbilityPayload::Strike {
                power_pct: 150,
                status: None,
            },
        },
        AbilityId::FirstAid => AbilityDef {
            id,
            description: "Patch up a nearby ally.".into(),
            energy_cost: 3,
            action_point_cost: 1,
            cooldown: 2,
            target: TargetRule::Ally { range: 2 },
            class: None,
            tags: vec![AbilityTag::Support],
            payload: AbilityPayload::Heal { amount: 5 },
        },
        AbilityId::Blink => AbilityDef {
            id,
            description: "Teleport to an empty cell nearby.".into(),
            energy_cost: 4,
            action_point_cost: 1,
            cooldown: 3,
            target: TargetRule::Cell { range: 3 },
            class: None,
            tags: vec![AbilityTag::Movement],
            payload: AbilityPayload::Blink,
        },
        AbilityId::SwapPlaces => AbilityDef {
            id,
            description: "Trade positions with an ally.".into(),
            energy_cost: 3,
            action_point_cost: 1,
            cooldown: 4,
            target: TargetRule::Ally { range: 3 },
            class: None,
            tags: vec![AbilityTag::Movement],
            payload: AbilityPayload::SwapPlaces,
        },
        AbilityId::Advance => AbilityDef {
            id,
            description: "Push forward with quickened steps.".into(),
            energy_cost: 2,
            action_point_cost: 1,
            cooldown: 2,
            target: TargetRule::SelfOnly,
            class: Some(UnitClass::Pawn),
            tags: vec![AbilityTag::Support],
            payload: AbilityPayload::GrantStatus {
                effect: EffectId::Hasted,
            },
        },
        AbilityId::Charge => AbilityDef {
            id,
            description: "Rush in a straight line and strike whatever stands adjacent.".into(),
            energy_cost: 4,
            action_point_cost: 1,
            cooldown: 3,
            target: TargetRule::Direction { range: 3 },
            class: Some(UnitClass::Knight),
            tags: vec![AbilityTag::Attack, AbilityTag::Movement],
            payload: AbilityPayload::ChargeStrike { power_pct: 120 },
        },
        AbilityId::Mend => AbilityDef {
            id,
            description: "Restore an ally's health.".into(),
            energy_cost: 3,
            action_point_cost: 1,
            cooldown: 1,
            target: TargetRule::Ally { range: 3 },
            class: Some(UnitClass::Bishop),
            tags: vec![AbilityTag::Support],
            payload: AbilityPayload::Heal { amount: 7 },
        },
        AbilityId::Purify => AbilityDef {
            id,
            description: "Cleanse an ally of every negative condition.".into(),
            energy_cost: 4,
            action_point_cost: 1,
            cooldown: 3,
            target: TargetRule::Ally { range: 3 },
            class: Some(UnitClass::Bishop),
            tags: vec![AbilityTag::Support],
            payload: AbilityPayload::Cleanse {
                category: EffectCategory::Negative,
            },
        },
        AbilityId::Bulwark => AbilityDef {
            id,
            description: "Brace behind a shield, halving incoming damage.".into(),
            energy_cost: 3,
            action_point_cost: 1,
            cooldown: 3,
            target: TargetRule::SelfOnly,
            class: Some(UnitClass::Rook),
            tags: vec![AbilityTag::Support],
            payload: AbilityPayload::GrantStatus {
                effect: EffectId::Shielded,
            },
        },
        AbilityId::Taunt => AbilityDef {
            id,
            description: "Goad an enemy into attacking only you.".into(),
            energy_cost: 2,
            action_point_cost: 1,
            cooldown: 3,
            target: TargetRule::Enemy { range: 2 },
            class: Some(UnitClass::Rook),
            tags: vec![AbilityTag::Support],
            payload: AbilityPayload::GrantStatus {
                effect: EffectId::Taunted,
            },
        },
        AbilityId::Fireball => AbilityDef {
            id,
            description: "Hurl fire that burns what it does not kill.".into(),
            energy_cost: 5,
            action_point_cost: 1,
            cooldown: 2,
            target: TargetRule::Enemy { range: 3 },
            class: Some(UnitClass::Queen),
            tags: vec![AbilityTag::Attack],
            payload: AbilityPayload::Strike {
                power_pct: 130,
                status: Some(StatusProc {
                    effect: EffectId::Burning,
                    chance_pct: 100,
                }),
            },
        },
        AbilityId::Annihilate => AbilityDef {
            id,
            description: "An overwhelming blast held in reserve for the decisive moment.".into(),
            energy_cost: 8,
            action_point_cost: 2,
            cooldown: 5,
            target: TargetRule::Enemy { range: 3 },
            class: Some(UnitClass::Queen),
            tags: vec![AbilityTag::Attack, AbilityTag::Ultimate],
            payload: AbilityPayload::Strike {
                power_pct: 250,
                status: None,
            },
        },
        AbilityId::RoyalRally => AbilityDef {
            id,
            description: "Grant a nearby ally an extra action.".into(),
            energy_cost: 3,
            action_point_cost: 1,
            cooldown: 3,
            target: TargetRule::Ally { range: 2 },
            class: Some(UnitClass::King),
            tags: vec![AbilityTag::Support],
            payload: AbilityPayload::Rally { action_points: 1 },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_id_has_a_builtin_definition() {
        for id in AbilityId::iter() {
            let def = builtin_def(id);
            assert_eq!(def.id, id);
            assert!(def.action_point_cost >= 1);
        }
    }

    #[test]
    fn ultimates_cost_more_than_their_basic_counterparts() {
        let basic = builtin_def(AbilityId::Fireball);
        let ultimate = builtin_def(AbilityId::Annihilate);
        assert!(ultimate.energy_cost > basic.energy_cost);
        assert!(ultimate.tags.contains(&AbilityTag::Ultimate));
    }
}
