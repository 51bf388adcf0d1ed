//! Status effect engine.
//!
//! Owns the catalog of effect templates and manages per-unit instance
//! lifecycle: application with stacking/refresh rules, trigger dispatch,
//! expiry, category cleanses, and the synchronous damage/targeting modifier
//! queries the combat resolver consults.

mod catalog;
mod engine;
mod template;

pub use catalog::{BuiltinEffects, EffectOracle, builtin_template};
pub use engine::{
    ApplyOutcome, EffectError, apply_effect, apply_random_negative_effect,
    apply_random_positive_effect, blocks_enemy_targeting, clear_effects_by_category,
    forced_target, incoming_damage_modifier, prevents_action, process_trigger, remove_effect,
    template_for,
};
pub use template::{EffectBehavior, EffectCategory, EffectId, EffectTemplate, TriggerPhase};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Env;
    use crate::state::{Faction, GameState, Position, UnitClass, UnitStats};

    fn setup() -> (GameState, crate::state::UnitId) {
        let mut state = GameState::default();
        let id = state
            .spawn_unit(
                "Footman",
                UnitClass::Pawn,
                Faction::Player,
                Position::new(0, 0),
                UnitStats::default(),
            )
            .unwrap();
        (state, id)
    }

    #[test]
    fn non_stackable_effect_refreshes_instead_of_duplicating() {
        let (mut state, unit) = setup();
        let env = Env::empty();
        let mut events = Vec::new();

        let first = apply_effect(&mut state, &env, unit, EffectId::Burning, None, &mut events);
        assert_eq!(first, Ok(ApplyOutcome::Applied));

        // Burn down one tick so the refresh is observable.
        state
            .units
            .unit_mut(unit)
            .unwrap()
            .effects
            .get_mut(EffectId::Burning)
            .unwrap()
            .remaining = 1;

        let second = apply_effect(&mut state, &env, unit, EffectId::Burning, None, &mut events);
        assert_eq!(second, Ok(ApplyOutcome::Refreshed));

        let effects = &state.units.unit(unit).unwrap().effects;
        assert_eq!(effects.len(), 1);
        assert_eq!(
            effects.get(EffectId::Burning).unwrap().remaining,
            builtin_template(EffectId::Burning).duration
        );
    }

    #[test]
    fn stackable_effect_stacks_to_its_limit_then_refreshes() {
        let (mut state, unit) = setup();
        let env = Env::empty();
        let mut events = Vec::new();
        let limit = builtin_template(EffectId::Poisoned).stack_limit;

        apply_effect(&mut state, &env, unit, EffectId::Poisoned, None, &mut events).unwrap();
        for expected in 2..=limit {
            let outcome =
                apply_effect(&mut state, &env, unit, EffectId::Poisoned, None, &mut events);
            assert_eq!(outcome, Ok(ApplyOutcome::Stacked(expected)));
        }

        let at_limit = apply_effect(&mut state, &env, unit, EffectId::Poisoned, None, &mut events);
        assert_eq!(at_limit, Ok(ApplyOutcome::Refreshed));
        assert_eq!(
            state
                .units
                .unit(unit)
                .unwrap()
                .effects
                .get(EffectId::Poisoned)
                .unwrap()
                .stacks,
            limit
        );
    }

    #[test]
    fn stat_deltas_restore_exactly_on_removal() {
        let (mut state, unit) = setup();
        let env = Env::empty();
        let mut events = Vec::new();
        let attack_before = state.units.unit(unit).unwrap().stats.attack;

        apply_effect(&mut state, &env, unit, EffectId::Weakened, None, &mut events).unwrap();
        assert!(state.units.unit(unit).unwrap().stats.attack < attack_before);

        assert!(remove_effect(&mut state, &env, unit, EffectId::Weakened, &mut events));
        assert_eq!(state.units.unit(unit).unwrap().stats.attack, attack_before);
    }

    #[test]
    fn removing_an_absent_effect_is_a_noop() {
        let (mut state, unit) = setup();
        let env = Env::empty();
        let mut events = Vec::new();

        assert!(!remove_effect(&mut state, &env, unit, EffectId::Hasted, &mut events));
        assert!(events.is_empty());
    }

    #[test]
    fn triggers_fire_in_insertion_order_and_expire_at_zero() {
        let (mut state, unit) = setup();
        let env = Env::empty();
        let mut events = Vec::new();

        // Enough health to survive every burn tick in this test.
        {
            let unit_state = state.units.unit_mut(unit).unwrap();
            unit_state.stats.max_hp = 30;
            unit_state.resources.hp = 30;
        }

        apply_effect(&mut state, &env, unit, EffectId::Burning, None, &mut events).unwrap();
        apply_effect(&mut state, &env, unit, EffectId::Slowed, None, &mut events).unwrap();
        events.clear();

        let hp_before = state.units.unit(unit).unwrap().resources.hp;
        process_trigger(&mut state, &env, unit, TriggerPhase::TurnStart, &mut events);

        // Burning (applied first) dealt its damage before slowed ticked.
        let damage_event = events
            .iter()
            .position(|e| matches!(e, crate::hooks::GameEvent::DamageApplied { .. }))
            .unwrap();
        assert!(state.units.unit(unit).unwrap().resources.hp < hp_before);
        assert_eq!(damage_event, 0);

        // Run the remaining ticks; both effects expire and restore stats.
        process_trigger(&mut state, &env, unit, TriggerPhase::TurnStart, &mut events);
        process_trigger(&mut state, &env, unit, TriggerPhase::TurnStart, &mut events);
        let unit_state = state.units.unit(unit).unwrap();
        assert!(unit_state.effects.is_empty());
        assert_eq!(unit_state.stats.move_range, UnitStats::default().move_range);
    }

    #[test]
    fn clear_by_category_restores_every_matching_instance() {
        let (mut state, unit) = setup();
        let env = Env::empty();
        let mut events = Vec::new();

        apply_effect(&mut state, &env, unit, EffectId::Weakened, None, &mut events).unwrap();
        apply_effect(&mut state, &env, unit, EffectId::Vulnerable, None, &mut events).unwrap();
        apply_effect(&mut state, &env, unit, EffectId::Hasted, None, &mut events).unwrap();

        let removed =
            clear_effects_by_category(&mut state, &env, unit, EffectCategory::Negative, &mut events);
        assert_eq!(removed, 2);

        let unit_state = state.units.unit(unit).unwrap();
        let defaults = UnitStats::default();
        assert_eq!(unit_state.stats.attack, defaults.attack);
        assert_eq!(unit_state.stats.defense, defaults.defense);
        // The positive effect is untouched.
        assert!(unit_state.effects.has(EffectId::Hasted));
    }

    #[test]
    fn shielded_halves_and_marked_amplifies_incoming_damage() {
        let (mut state, unit) = setup();
        let env = Env::empty();
        let mut events = Vec::new();

        apply_effect(&mut state, &env, unit, EffectId::Shielded, None, &mut events).unwrap();
        assert_eq!(incoming_damage_modifier(&state, &env, unit, 10), 5);

        apply_effect(&mut state, &env, unit, EffectId::Marked, None, &mut events).unwrap();
        // 10 -> 5 (shielded) -> 6 (marked, 5/4 floor)
        assert_eq!(incoming_damage_modifier(&state, &env, unit, 10), 6);
    }

    #[test]
    fn taunt_forces_targeting_while_source_lives() {
        let (mut state, unit) = setup();
        let source = state
            .spawn_unit(
                "Grunt",
                UnitClass::Rook,
                Faction::Enemy,
                Position::new(1, 0),
                UnitStats::default(),
            )
            .unwrap();
        let env = Env::empty();
        let mut events = Vec::new();

        apply_effect(&mut state, &env, unit, EffectId::Taunted, Some(source), &mut events)
            .unwrap();
        assert_eq!(forced_target(&state, &env, unit), Some(source));

        // A dead source no longer forces targeting.
        state.units.unit_mut(source).unwrap().resources.hp = 0;
        assert_eq!(forced_target(&state, &env, unit), None);
    }

    #[test]
    fn random_negative_pick_is_deterministic_for_a_seed() {
        let (mut state, unit) = setup();
        state.game_seed = 99;
        let env = Env::empty();
        let mut events = Vec::new();

        let picked =
            apply_random_negative_effect(&mut state, &env, unit, None, &mut events).unwrap();

        let (mut replay, replay_unit) = setup();
        replay.game_seed = 99;
        let replay_pick =
            apply_random_negative_effect(&mut replay, &env, replay_unit, None, &mut events)
                .unwrap();

        assert_eq!(picked, replay_pick);
        assert_eq!(
            builtin_template(picked).category,
            EffectCategory::Negative
        );
    }
}
