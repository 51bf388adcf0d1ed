//! End-to-end combat resolution tests with forced roll outcomes.

use std::collections::VecDeque;
use std::sync::Mutex;

use tactics_core::{
    AttackError, EffectId, Env, Faction, GameOutcome, GameState, Position, RngOracle, TurnFlags,
    UnitClass, UnitId, UnitStats, apply_healing, effect, process_attack,
};

/// RNG stub that fails every percentage roll and removes all jitter.
/// Attacks resolve to the pure formula value with no miss/crit/counter/status.
struct FlatRng;

impl RngOracle for FlatRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        0
    }

    fn roll_d100(&self, _seed: u64) -> u32 {
        100
    }

    fn range(&self, _seed: u64, _min: u32, _max: u32) -> u32 {
        100
    }
}

/// RNG stub returning queued d100 results in call order, with jitter pinned
/// to 100. Lets tests force each Bernoulli draw and observe the fixed
/// miss -> critical -> counter -> status ordering.
struct SequenceRng {
    rolls: Mutex<VecDeque<u32>>,
}

impl SequenceRng {
    fn new(rolls: &[u32]) -> Self {
        Self {
            rolls: Mutex::new(rolls.iter().copied().collect()),
        }
    }

    fn remaining(&self) -> usize {
        self.rolls.lock().unwrap().len()
    }
}

impl RngOracle for SequenceRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        0
    }

    fn roll_d100(&self, _seed: u64) -> u32 {
        self.rolls.lock().unwrap().pop_front().unwrap_or(100)
    }

    fn range(&self, _seed: u64, _min: u32, _max: u32) -> u32 {
        100
    }
}

fn duel(attacker_stats: UnitStats, defender_stats: UnitStats) -> (GameState, UnitId, UnitId) {
    let mut state = GameState::default();
    let attacker = state
        .spawn_unit(
            "Attacker",
            UnitClass::Generic,
            Faction::Player,
            Position::new(0, 0),
            attacker_stats,
        )
        .unwrap();
    let defender = state
        .spawn_unit(
            "Defender",
            UnitClass::Generic,
            Faction::Enemy,
            Position::new(1, 0),
            defender_stats,
        )
        .unwrap();
    (state, attacker, defender)
}

#[test]
fn attack_matches_the_reference_formula_without_randomness() {
    // 10 attack into 3 defense: floor(10 * 20 / 23) = 8, landing 15 hp at 7.
    let (mut state, attacker, defender) = duel(
        UnitStats {
            attack: 10,
            ..UnitStats::default()
        },
        UnitStats {
            max_hp: 15,
            defense: 3,
            ..UnitStats::default()
        },
    );
    let rng = FlatRng;
    let env = Env::empty().with_rng(&rng);
    let mut events = Vec::new();

    let outcome = process_attack(&mut state, &env, attacker, defender, &mut events).unwrap();

    assert!(!outcome.missed);
    assert!(!outcome.critical);
    assert_eq!(outcome.damage, 8);
    assert_eq!(outcome.counter_damage, None);
    assert_eq!(outcome.status_applied, None);
    assert_eq!(state.units.unit(defender).unwrap().resources.hp, 7);
}

#[test]
fn rolls_resolve_in_miss_crit_counter_status_order() {
    let (mut state, attacker, defender) = duel(
        UnitStats {
            attack: 10,
            max_hp: 40,
            ..UnitStats::default()
        },
        UnitStats {
            max_hp: 40,
            ..UnitStats::default()
        },
    );
    // miss fails, crit succeeds, counter succeeds, status fails.
    let rng = SequenceRng::new(&[100, 1, 1, 100]);
    let env = Env::empty().with_rng(&rng);
    let mut events = Vec::new();

    let outcome = process_attack(&mut state, &env, attacker, defender, &mut events).unwrap();

    assert!(!outcome.missed);
    assert!(outcome.critical);
    assert!(outcome.counter_damage.is_some());
    assert_eq!(outcome.status_applied, None);
    assert_eq!(rng.remaining(), 0);
}

#[test]
fn a_miss_short_circuits_the_remaining_rolls() {
    let (mut state, attacker, defender) = duel(UnitStats::default(), UnitStats::default());
    // Only the miss roll is consumed.
    let rng = SequenceRng::new(&[1, 1, 1, 1]);
    let env = Env::empty().with_rng(&rng);
    let mut events = Vec::new();

    let outcome = process_attack(&mut state, &env, attacker, defender, &mut events).unwrap();

    assert!(outcome.missed);
    assert_eq!(outcome.damage, 0);
    assert_eq!(rng.remaining(), 3);
    assert_eq!(
        state.units.unit(defender).unwrap().resources.hp,
        UnitStats::default().max_hp
    );
}

#[test]
fn counter_attack_deals_reduced_damage_back() {
    let (mut state, attacker, defender) = duel(
        UnitStats {
            attack: 10,
            max_hp: 40,
            defense: 0,
            ..UnitStats::default()
        },
        UnitStats {
            attack: 10,
            max_hp: 40,
            defense: 0,
            ..UnitStats::default()
        },
    );
    // miss fails, crit fails, counter succeeds, status fails.
    let rng = SequenceRng::new(&[100, 100, 1, 100]);
    let env = Env::empty().with_rng(&rng);
    let mut events = Vec::new();

    let outcome = process_attack(&mut state, &env, attacker, defender, &mut events).unwrap();

    // Full riposte would be 10; at 70% it lands 7 on the attacker.
    assert_eq!(outcome.counter_damage, Some(7));
    assert_eq!(state.units.unit(attacker).unwrap().resources.hp, 40 - 7);
}

#[test]
fn rejected_attacks_mutate_nothing() {
    let (mut state, attacker, defender) = duel(UnitStats::default(), UnitStats::default());
    // Move the defender far out of range.
    state.grid.move_unit(defender, Position::new(7, 7));
    state.units.unit_mut(defender).unwrap().position = Some(Position::new(7, 7));

    let rng = FlatRng;
    let env = Env::empty().with_rng(&rng);
    let mut events = Vec::new();

    let result = process_attack(&mut state, &env, attacker, defender, &mut events);
    assert_eq!(result, Err(AttackError::OutOfRange));

    let attacker_state = state.units.unit(attacker).unwrap();
    assert!(!attacker_state.flags.contains(TurnFlags::HAS_ATTACKED));
    assert!(events.is_empty());
}

#[test]
fn a_unit_may_only_attack_once_per_turn() {
    let (mut state, attacker, defender) = duel(
        UnitStats {
            attack: 5,
            max_hp: 40,
            ..UnitStats::default()
        },
        UnitStats {
            max_hp: 40,
            ..UnitStats::default()
        },
    );
    let rng = FlatRng;
    let env = Env::empty().with_rng(&rng);
    let mut events = Vec::new();

    process_attack(&mut state, &env, attacker, defender, &mut events).unwrap();
    let again = process_attack(&mut state, &env, attacker, defender, &mut events);
    assert_eq!(again, Err(AttackError::AlreadyAttacked));
}

#[test]
fn same_faction_targets_are_rejected() {
    let mut state = GameState::default();
    let first = state
        .spawn_unit(
            "A",
            UnitClass::Pawn,
            Faction::Player,
            Position::new(0, 0),
            UnitStats::default(),
        )
        .unwrap();
    let second = state
        .spawn_unit(
            "B",
            UnitClass::Pawn,
            Faction::Player,
            Position::new(1, 0),
            UnitStats::default(),
        )
        .unwrap();

    let env = Env::empty();
    let mut events = Vec::new();
    let result = process_attack(&mut state, &env, first, second, &mut events);
    assert_eq!(result, Err(AttackError::SameFaction));
}

#[test]
fn shielded_halves_damage_before_the_floor() {
    let (mut state, attacker, defender) = duel(
        UnitStats {
            attack: 10,
            ..UnitStats::default()
        },
        UnitStats {
            max_hp: 20,
            defense: 3,
            ..UnitStats::default()
        },
    );
    let rng = FlatRng;
    let env = Env::empty().with_rng(&rng);
    let mut events = Vec::new();

    effect::apply_effect(&mut state, &env, defender, EffectId::Shielded, None, &mut events)
        .unwrap();

    let outcome = process_attack(&mut state, &env, attacker, defender, &mut events).unwrap();
    // Formula damage 8, halved to 4 by the shield.
    assert_eq!(outcome.damage, 4);
    assert_eq!(state.units.unit(defender).unwrap().resources.hp, 16);
}

#[test]
fn invisible_defenders_cannot_be_targeted() {
    let (mut state, attacker, defender) = duel(UnitStats::default(), UnitStats::default());
    let env = Env::empty();
    let mut events = Vec::new();

    effect::apply_effect(&mut state, &env, defender, EffectId::Invisible, None, &mut events)
        .unwrap();

    let result = process_attack(&mut state, &env, attacker, defender, &mut events);
    assert_eq!(result, Err(AttackError::TargetUntargetable));
}

#[test]
fn taunted_attackers_must_strike_the_taunt_source() {
    let mut state = GameState::default();
    let attacker = state
        .spawn_unit(
            "Grunt",
            UnitClass::Generic,
            Faction::Enemy,
            Position::new(1, 1),
            UnitStats::default(),
        )
        .unwrap();
    let taunter = state
        .spawn_unit(
            "Tower",
            UnitClass::Rook,
            Faction::Player,
            Position::new(0, 1),
            UnitStats {
                max_hp: 40,
                ..UnitStats::default()
            },
        )
        .unwrap();
    let bystander = state
        .spawn_unit(
            "Footman",
            UnitClass::Pawn,
            Faction::Player,
            Position::new(2, 1),
            UnitStats::default(),
        )
        .unwrap();

    let rng = FlatRng;
    let env = Env::empty().with_rng(&rng);
    let mut events = Vec::new();
    effect::apply_effect(
        &mut state,
        &env,
        attacker,
        EffectId::Taunted,
        Some(taunter),
        &mut events,
    )
    .unwrap();

    let blocked = process_attack(&mut state, &env, attacker, bystander, &mut events);
    assert_eq!(blocked, Err(AttackError::ForcedTargetElsewhere(taunter)));

    let allowed = process_attack(&mut state, &env, attacker, taunter, &mut events);
    assert!(allowed.is_ok());
}

#[test]
fn healing_clamps_to_max_and_never_returns_negative() {
    let (mut state, _attacker, defender) = duel(UnitStats::default(), UnitStats::default());
    let env = Env::empty();
    let mut events = Vec::new();

    state.units.unit_mut(defender).unwrap().resources.hp = 8;
    let max = state.units.unit(defender).unwrap().stats.max_hp;

    let healed = apply_healing(&mut state, &env, defender, 50, &mut events);
    assert_eq!(healed, max - 8);
    assert_eq!(state.units.unit(defender).unwrap().resources.hp, max);

    let overheal = apply_healing(&mut state, &env, defender, 10, &mut events);
    assert_eq!(overheal, 0);

    let negative = apply_healing(&mut state, &env, defender, -5, &mut events);
    assert_eq!(negative, 0);
    assert_eq!(state.units.unit(defender).unwrap().resources.hp, max);
}

#[test]
fn defeating_the_king_latches_the_opposing_win() {
    let mut state = GameState::default();
    let attacker = state
        .spawn_unit(
            "Queen",
            UnitClass::Queen,
            Faction::Player,
            Position::new(0, 0),
            UnitStats {
                attack: 50,
                max_hp: 40,
                ..UnitStats::default()
            },
        )
        .unwrap();
    let king = state
        .spawn_unit(
            "Enemy King",
            UnitClass::King,
            Faction::Enemy,
            Position::new(1, 0),
            UnitStats {
                max_hp: 5,
                defense: 0,
                ..UnitStats::default()
            },
        )
        .unwrap();

    let rng = FlatRng;
    let env = Env::empty().with_rng(&rng);
    let mut events = Vec::new();

    let outcome = process_attack(&mut state, &env, attacker, king, &mut events).unwrap();

    assert!(outcome.defender_defeated);
    assert_eq!(state.turn.outcome, Some(GameOutcome::PlayerWin));
    // The defeated king left the grid.
    assert_eq!(state.grid.unit_at(Position::new(1, 0)), None);
    assert_eq!(state.units.unit(king).unwrap().position, None);
    // The attacker was paid the king's experience award.
    assert_eq!(state.units.unit(attacker).unwrap().experience, 100);
}

#[test]
fn direct_damage_and_attributed_damage_share_the_health_path() {
    let (mut state, _attacker, defender) = duel(UnitStats::default(), UnitStats::default());
    let env = Env::empty();
    let mut events = Vec::new();

    let dealt = tactics_core::apply_direct_damage(&mut state, &env, defender, 4, &mut events);
    assert_eq!(dealt, 4);

    // Overkill clamps at zero rather than going negative.
    let overkill = tactics_core::apply_direct_damage(&mut state, &env, defender, 100, &mut events);
    assert_eq!(
        overkill,
        UnitStats::default().max_hp - 4
    );
    assert_eq!(state.units.unit(defender).unwrap().resources.hp, 0);
}
