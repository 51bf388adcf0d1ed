//! Effect catalog oracle and built-in templates.

use strum::IntoEnumIterator;

use super::template::{EffectBehavior, EffectCategory, EffectId, EffectTemplate, TriggerPhase};
use crate::state::StatKind;

/// Oracle providing status effect templates.
///
/// `tactics-content` implements this over RON data; [`BuiltinEffects`] keeps
/// the engine usable headless with the same ids.
pub trait EffectOracle: Send + Sync {
    /// Template for an effect id. `None` if the catalog does not define it.
    fn template(&self, id: EffectId) -> Option<EffectTemplate>;

    /// Every effect id the catalog defines.
    fn catalog_ids(&self) -> Vec<EffectId>;

    /// Ids of a category, in catalog order. Used by random effect selection.
    fn ids_by_category(&self, category: EffectCategory) -> Vec<EffectId> {
        self.catalog_ids()
            .into_iter()
            .filter(|&id| {
                self.template(id)
                    .is_some_and(|template| template.category == category)
            })
            .collect()
    }
}

/// Built-in effect templates mirroring the shipped catalog.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinEffects;

impl EffectOracle for BuiltinEffects {
    fn template(&self, id: EffectId) -> Option<EffectTemplate> {
        Some(builtin_template(id))
    }

    fn catalog_ids(&self) -> Vec<EffectId> {
        EffectId::iter().collect()
    }
}

/// Built-in template for an effect id. Defined for every id, which makes
/// this the universal fallback when no catalog oracle is wired.
pub fn builtin_template(id: EffectId) -> EffectTemplate {
    let template = |description: &str,
                    duration: u8,
                    category: EffectCategory,
                    behaviors: Vec<EffectBehavior>| EffectTemplate {
        id,
        description: description.to_string(),
        duration,
        trigger: TriggerPhase::TurnStart,
        stackable: false,
        stack_limit: 1,
        prevents_action: false,
        category,
        behaviors,
    };

    match id {
        EffectId::Burning => template(
            "Takes fire damage at the start of each turn.",
            3,
            EffectCategory::Negative,
            vec![EffectBehavior::PeriodicDamage { amount: 4 }],
        ),
        EffectId::Poisoned => EffectTemplate {
            stackable: true,
            stack_limit: 3,
            ..template(
                "Takes poison damage each turn. Stacks intensify the dose.",
                3,
                EffectCategory::Negative,
                vec![EffectBehavior::PeriodicDamage { amount: 2 }],
            )
        },
        EffectId::Regenerating => template(
            "Recovers health at the start of each turn.",
            3,
            EffectCategory::Positive,
            vec![EffectBehavior::PeriodicHeal { amount: 3 }],
        ),
        EffectId::Shielded => template(
            "Incoming damage is halved.",
            2,
            EffectCategory::Positive,
            vec![EffectBehavior::IncomingDamageScale { numer: 1, denom: 2 }],
        ),
        EffectId::Marked => template(
            "Incoming damage is increased by a quarter.",
            2,
            EffectCategory::Negative,
            vec![EffectBehavior::IncomingDamageScale { numer: 5, denom: 4 }],
        ),
        EffectId::Stunned => EffectTemplate {
            prevents_action: true,
            ..template("Cannot act.", 1, EffectCategory::Negative, vec![])
        },
        EffectId::Slowed => template(
            "Movement range reduced.",
            2,
            EffectCategory::Negative,
            vec![EffectBehavior::StatDelta {
                stat: StatKind::MoveRange,
                delta: -1,
            }],
        ),
        EffectId::Hasted => template(
            "Movement range increased.",
            2,
            EffectCategory::Positive,
            vec![EffectBehavior::StatDelta {
                stat: StatKind::MoveRange,
                delta: 1,
            }],
        ),
        EffectId::Weakened => template(
            "Attack reduced.",
            2,
            EffectCategory::Negative,
            vec![EffectBehavior::StatDelta {
                stat: StatKind::Attack,
                delta: -3,
            }],
        ),
        EffectId::Strengthened => template(
            "Attack increased.",
            2,
            EffectCategory::Positive,
            vec![EffectBehavior::StatDelta {
                stat: StatKind::Attack,
                delta: 3,
            }],
        ),
        EffectId::Vulnerable => template(
            "Defense reduced.",
            2,
            EffectCategory::Negative,
            vec![EffectBehavior::StatDelta {
                stat: StatKind::Defense,
                delta: -2,
            }],
        ),
        EffectId::Invisible => template(
            "Cannot be targeted by hostile units.",
            1,
            EffectCategory::Positive,
            vec![EffectBehavior::BlockEnemyTargeting],
        ),
        EffectId::Taunted => template(
            "Must attack the unit that applied this.",
            2,
            EffectCategory::Negative,
            vec![EffectBehavior::ForceTargetingToSource],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_id_has_a_builtin_template() {
        for id in EffectId::iter() {
            let template = builtin_template(id);
            assert_eq!(template.id, id);
            assert!(template.duration > 0);
        }
    }

    #[test]
    fn category_pools_are_disjoint() {
        let catalog = BuiltinEffects;
        let negative = catalog.ids_by_category(EffectCategory::Negative);
        let positive = catalog.ids_by_category(EffectCategory::Positive);

        assert!(negative.contains(&EffectId::Stunned));
        assert!(positive.contains(&EffectId::Shielded));
        assert!(negative.iter().all(|id| !positive.contains(id)));
    }
}
