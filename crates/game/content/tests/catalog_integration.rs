//! End-to-end checks that the shipped catalogs drive the rules engine.

use tactics_core::{
    AbilityId, AbilityTarget, EffectId, Env, Faction, GameState, GridBounds, PcgRng, Position,
    TurnSequencer, UnitClass, process_attack, use_ability,
};
use tactics_content::{AbilityCatalog, BalanceTables, EffectCatalog, UnitArchetypes};

#[test]
fn catalogs_drive_a_full_encounter() {
    let effects = EffectCatalog::load().unwrap();
    let abilities = AbilityCatalog::load().unwrap();
    let tables = BalanceTables::load().unwrap();
    let archetypes = UnitArchetypes::load().unwrap();
    let rng = PcgRng;

    let mut state = GameState::with_seed(7, GridBounds::new(8, 8));
    let knight = archetypes
        .archetype(UnitClass::Knight)
        .unwrap()
        .spawn(&mut state, Faction::Player, Position::new(0, 0))
        .unwrap();
    let pawn = archetypes
        .archetype(UnitClass::Pawn)
        .unwrap()
        .spawn(&mut state, Faction::Enemy, Position::new(1, 0))
        .unwrap();

    let env = Env::empty()
        .with_effects(&effects)
        .with_abilities(&abilities)
        .with_tables(&tables)
        .with_rng(&rng);

    let mut sequencer = TurnSequencer::new(&mut state, env);
    sequencer.start_encounter();
    assert_eq!(state.turn.current_unit(), Some(knight));

    let mut events = Vec::new();
    let outcome = process_attack(&mut state, &env, knight, pawn, &mut events).unwrap();
    if !outcome.missed {
        assert!(outcome.damage >= 1);
    }
    assert!(!state.log.is_empty());
}

#[test]
fn fireball_from_the_catalog_applies_burning() {
    let effects = EffectCatalog::load().unwrap();
    let abilities = AbilityCatalog::load().unwrap();
    let tables = BalanceTables::load().unwrap();
    let archetypes = UnitArchetypes::load().unwrap();
    let rng = PcgRng;

    let mut state = GameState::with_seed(11, GridBounds::new(8, 8));
    let queen = archetypes
        .archetype(UnitClass::Queen)
        .unwrap()
        .spawn(&mut state, Faction::Player, Position::new(0, 0))
        .unwrap();
    let pawn = archetypes
        .archetype(UnitClass::Pawn)
        .unwrap()
        .spawn(&mut state, Faction::Enemy, Position::new(2, 0))
        .unwrap();

    let env = Env::empty()
        .with_effects(&effects)
        .with_abilities(&abilities)
        .with_tables(&tables)
        .with_rng(&rng);

    let mut events = Vec::new();
    use_ability(
        &mut state,
        &env,
        queen,
        AbilityId::Fireball,
        &AbilityTarget::Unit(pawn),
        &mut events,
    )
    .unwrap();

    // The catalog's fireball burns on every hit, and the pawn's stat block
    // always survives a single cast.
    let target = state.units.unit(pawn).unwrap();
    assert!(target.is_alive());
    assert!(target.effects.has(EffectId::Burning));

    let caster = state.units.unit(queen).unwrap();
    assert!(!caster.cooldowns.is_ready(AbilityId::Fireball));
}
