//! End-to-end sequencing tests driving the public engine API.

use std::sync::{Arc, Mutex};

use tactics_core::{
    EffectId, Env, Faction, GameEvent, GameOutcome, GameState, Hook, HookError, HookRegistry,
    Position, TurnSequencer, UnitClass, UnitId, UnitStats, effect,
};

/// Hook that records every event it sees, for asserting dispatch order.
struct EventRecorder {
    seen: Arc<Mutex<Vec<GameEvent>>>,
}

impl Hook for EventRecorder {
    fn name(&self) -> &'static str {
        "event-recorder"
    }

    fn handle(&self, event: &GameEvent, _state: &GameState) -> Result<(), HookError> {
        self.seen.lock().unwrap().push(event.clone());
        Ok(())
    }
}

fn recorder() -> (HookRegistry, Arc<Mutex<Vec<GameEvent>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut registry = HookRegistry::new();
    registry.register(Arc::new(EventRecorder {
        seen: Arc::clone(&seen),
    }));
    (registry, seen)
}

fn spawn(
    state: &mut GameState,
    name: &str,
    class: UnitClass,
    faction: Faction,
    position: Position,
) -> UnitId {
    state
        .spawn_unit(name, class, faction, position, UnitStats::default())
        .unwrap()
}

#[test]
fn two_unit_round_cycles_once_after_two_end_turns() {
    let mut state = GameState::default();
    let player = spawn(
        &mut state,
        "Footman",
        UnitClass::Pawn,
        Faction::Player,
        Position::new(0, 0),
    );
    let enemy = spawn(
        &mut state,
        "Grunt",
        UnitClass::Pawn,
        Faction::Enemy,
        Position::new(5, 5),
    );

    let (hooks, seen) = recorder();
    let env = Env::empty().with_hooks(&hooks);
    let mut sequencer = TurnSequencer::new(&mut state, env);
    sequencer.start_encounter();

    sequencer.end_turn();
    sequencer.drive();
    sequencer.end_turn();
    sequencer.drive();

    let events = seen.lock().unwrap();
    let round_ends = events
        .iter()
        .filter(|e| matches!(e, GameEvent::RoundEnded { .. }))
        .count();
    let round_starts = events
        .iter()
        .filter(|e| matches!(e, GameEvent::RoundStarted { .. }))
        .count();
    // Opening round start plus exactly one boundary cycle.
    assert_eq!(round_ends, 1);
    assert_eq!(round_starts, 2);

    // Back to the first unit of the new round.
    assert_eq!(state.turn.index, 0);
    assert_eq!(state.turn.round, 2);
    assert_eq!(state.turn.current_unit(), Some(player));

    // Both units took exactly one turn in round one, player first.
    let turn_order: Vec<UnitId> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::TurnStarted { unit, round: 1, .. } => Some(*unit),
            _ => None,
        })
        .collect();
    assert_eq!(turn_order, vec![player, enemy]);
}

#[test]
fn end_turn_is_deferred_until_driven() {
    let mut state = GameState::default();
    let player = spawn(
        &mut state,
        "Footman",
        UnitClass::Pawn,
        Faction::Player,
        Position::new(0, 0),
    );
    spawn(
        &mut state,
        "Grunt",
        UnitClass::Pawn,
        Faction::Enemy,
        Position::new(5, 5),
    );

    let env = Env::empty();
    let mut sequencer = TurnSequencer::new(&mut state, env);
    sequencer.start_encounter();

    // Without a drive step the acting unit does not change.
    sequencer.end_turn();
    assert_eq!(sequencer.state().turn.current_unit(), Some(player));

    sequencer.drive();
    assert_ne!(state.turn.current_unit(), Some(player));
}

#[test]
fn action_points_replenish_at_turn_start() {
    let mut state = GameState::default();
    let player = spawn(
        &mut state,
        "Footman",
        UnitClass::Pawn,
        Faction::Player,
        Position::new(0, 0),
    );
    spawn(
        &mut state,
        "Grunt",
        UnitClass::Pawn,
        Faction::Enemy,
        Position::new(5, 5),
    );

    let env = Env::empty();
    let mut sequencer = TurnSequencer::new(&mut state, env);
    sequencer.start_encounter();

    assert!(sequencer.use_action_points(player, 2));
    assert!(!sequencer.use_action_points(player, 1));

    // Run a full round; the player's points are back at max.
    sequencer.end_turn();
    sequencer.drive();
    sequencer.end_turn();
    sequencer.drive();

    assert_eq!(state.turn.current_unit(), Some(player));
    assert_eq!(
        state.units.unit(player).unwrap().resources.action_points,
        UnitStats::default().max_action_points
    );
}

#[test]
fn stunned_unit_skips_its_turn_and_recovers_next_round() {
    let mut state = GameState::default();
    let player = spawn(
        &mut state,
        "Footman",
        UnitClass::Pawn,
        Faction::Player,
        Position::new(0, 0),
    );
    let enemy = spawn(
        &mut state,
        "Grunt",
        UnitClass::Pawn,
        Faction::Enemy,
        Position::new(5, 5),
    );

    let env = Env::empty();
    let mut events = Vec::new();
    effect::apply_effect(&mut state, &env, player, EffectId::Stunned, None, &mut events).unwrap();

    let (hooks, seen) = recorder();
    let env = Env::empty().with_hooks(&hooks);
    let mut sequencer = TurnSequencer::new(&mut state, env);
    sequencer.start_encounter();

    // The stun was consumed by the first turn-start cycle and the turn
    // auto-skipped to the enemy.
    assert!(!state.units.unit(player).unwrap().effects.has(EffectId::Stunned));
    assert_eq!(state.turn.current_unit(), Some(enemy));

    // Next round the player acts normally.
    let mut sequencer = TurnSequencer::new(&mut state, env);
    sequencer.end_turn();
    sequencer.drive();
    assert_eq!(state.turn.current_unit(), Some(player));
    assert_eq!(state.turn.round, 2);

    let events = seen.lock().unwrap();
    let player_turns = events
        .iter()
        .filter(|e| matches!(e, GameEvent::TurnStarted { unit, .. } if *unit == player))
        .count();
    assert_eq!(player_turns, 2);
}

#[test]
fn defeated_units_in_a_stale_order_are_skipped() {
    let mut state = GameState::default();
    let first = spawn(
        &mut state,
        "Footman",
        UnitClass::Pawn,
        Faction::Player,
        Position::new(0, 0),
    );
    let second = spawn(
        &mut state,
        "Archer",
        UnitClass::Pawn,
        Faction::Player,
        Position::new(1, 0),
    );
    spawn(
        &mut state,
        "Grunt",
        UnitClass::Pawn,
        Faction::Enemy,
        Position::new(5, 5),
    );

    let (hooks, seen) = recorder();
    let env = Env::empty().with_hooks(&hooks);
    let mut sequencer = TurnSequencer::new(&mut state, env);
    sequencer.start_encounter();
    assert_eq!(state.turn.current_unit(), Some(first));

    // The second unit dies mid-round while still holding an order slot.
    state.units.unit_mut(second).unwrap().resources.hp = 0;

    let mut sequencer = TurnSequencer::new(&mut state, env);
    sequencer.end_turn();
    sequencer.drive();

    // Its slot was skipped without a turn-start trigger.
    let events = seen.lock().unwrap();
    assert!(
        events
            .iter()
            .all(|e| !matches!(e, GameEvent::TurnStarted { unit, .. } if *unit == second))
    );
}

#[test]
fn eliminating_a_faction_latches_game_over_at_the_round_boundary() {
    let mut state = GameState::default();
    spawn(
        &mut state,
        "Footman",
        UnitClass::Pawn,
        Faction::Player,
        Position::new(0, 0),
    );
    let enemy = spawn(
        &mut state,
        "Grunt",
        UnitClass::Pawn,
        Faction::Enemy,
        Position::new(5, 5),
    );

    let env = Env::empty();
    let mut sequencer = TurnSequencer::new(&mut state, env);
    sequencer.start_encounter();

    state.units.unit_mut(enemy).unwrap().resources.hp = 0;

    // Run out the round; the census check latches the outcome.
    let mut sequencer = TurnSequencer::new(&mut state, env);
    sequencer.end_turn();
    sequencer.drive();
    sequencer.end_turn();
    sequencer.drive();

    assert_eq!(state.turn.outcome, Some(GameOutcome::PlayerWin));

    // Latched means terminal: further transitions are ignored.
    let round = state.turn.round;
    let mut sequencer = TurnSequencer::new(&mut state, env);
    sequencer.end_turn();
    sequencer.drive();
    assert_eq!(state.turn.round, round);
}

#[test]
fn empty_initiative_order_idles_without_panicking() {
    let mut state = GameState::default();
    let env = Env::empty();
    let mut sequencer = TurnSequencer::new(&mut state, env);
    sequencer.start_encounter();

    assert!(state.turn.initiative.is_empty());
    assert!(state.turn.pending.is_empty());
}

#[test]
fn turn_history_records_a_bounded_window() {
    let mut state = GameState::default();
    spawn(
        &mut state,
        "Footman",
        UnitClass::Pawn,
        Faction::Player,
        Position::new(0, 0),
    );
    spawn(
        &mut state,
        "Grunt",
        UnitClass::Pawn,
        Faction::Enemy,
        Position::new(5, 5),
    );

    let env = Env::empty();
    let mut sequencer = TurnSequencer::new(&mut state, env);
    sequencer.start_encounter();
    for _ in 0..20 {
        let mut sequencer = TurnSequencer::new(&mut state, env);
        sequencer.end_turn();
        sequencer.drive();
    }

    assert_eq!(
        state.history.len(),
        tactics_core::GameConfig::TURN_HISTORY_CAPACITY
    );
    // Every record carries the action-point snapshot taken at turn start.
    assert!(
        state
            .history
            .iter()
            .all(|record| record.action_points == UnitStats::default().max_action_points)
    );
}
