//! Status effect templates.
//!
//! A template is the immutable, shared half of an effect: identity, timing,
//! stacking rules, and a list of tagged behaviors. The live half (remaining
//! duration, stacks, source) is [`EffectInstance`] in unit state.
//!
//! Behaviors are data, not closures: the engine interprets each variant at
//! the right lifecycle point (`on_apply`/`on_trigger`/`on_remove` for stat
//! deltas and periodic effects, synchronous queries for damage and targeting
//! modifiers).
//!
//! [`EffectInstance`]: crate::state::EffectInstance

use crate::state::StatKind;

/// Canonical status effect identifier.
///
/// All lookup goes through this enum; names exist only for logs and data
/// files, resolved once at load time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EffectId {
    Burning,
    Poisoned,
    Regenerating,
    Shielded,
    Marked,
    Stunned,
    Slowed,
    Hasted,
    Weakened,
    Strengthened,
    Vulnerable,
    Invisible,
    Taunted,
}

impl EffectId {
    /// Static display name for logs and events.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Burning => "burning",
            Self::Poisoned => "poisoned",
            Self::Regenerating => "regenerating",
            Self::Shielded => "shielded",
            Self::Marked => "marked",
            Self::Stunned => "stunned",
            Self::Slowed => "slowed",
            Self::Hasted => "hasted",
            Self::Weakened => "weakened",
            Self::Strengthened => "strengthened",
            Self::Vulnerable => "vulnerable",
            Self::Invisible => "invisible",
            Self::Taunted => "taunted",
        }
    }
}

/// Point in the turn/round lifecycle at which an effect activates and its
/// duration ticks down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerPhase {
    TurnStart,
    TurnEnd,
    OnMove,
    OnAttack,
    OnDamage,
    OnDamaged,
    OnTargeted,
    RoundStart,
    RoundEnd,
}

/// Whether an effect helps, hurts, or both. Cleansing abilities remove by
/// category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectCategory {
    Positive,
    Negative,
    Mixed,
}

/// One tagged behavior of an effect.
///
/// Stat deltas are applied per stack on apply and reversed exactly on
/// removal. Periodic amounts scale with the stack count at trigger time.
/// Modifier variants are consulted synchronously by the combat resolver and
/// targeting code; they are never applied retroactively.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectBehavior {
    /// Temporary stat override, restored on removal.
    StatDelta { stat: StatKind, delta: i32 },

    /// Source-less damage each time the trigger phase fires.
    PeriodicDamage { amount: i32 },

    /// Healing each time the trigger phase fires.
    PeriodicHeal { amount: i32 },

    /// Scales incoming damage by `numer / denom` before the minimum-damage
    /// floor (shielded halves with 1/2, marked amplifies with 5/4).
    IncomingDamageScale { numer: u32, denom: u32 },

    /// Hostile units cannot target the owner.
    BlockEnemyTargeting,

    /// The owner must direct attacks at the effect's source while it lives.
    ForceTargetingToSource,
}

/// Complete specification for a status effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectTemplate {
    pub id: EffectId,
    pub description: String,

    /// Duration in trigger ticks.
    pub duration: u8,

    /// When the effect activates and its duration decrements.
    pub trigger: TriggerPhase,

    pub stackable: bool,

    /// Maximum stacks; ignored for non-stackable effects.
    pub stack_limit: u8,

    /// Owner cannot act while this effect is active.
    pub prevents_action: bool,

    pub category: EffectCategory,

    pub behaviors: Vec<EffectBehavior>,
}

impl EffectTemplate {
    /// Returns true if this effect carries any periodic behavior.
    pub fn is_periodic(&self) -> bool {
        self.behaviors.iter().any(|b| {
            matches!(
                b,
                EffectBehavior::PeriodicDamage { .. } | EffectBehavior::PeriodicHeal { .. }
            )
        })
    }
}
