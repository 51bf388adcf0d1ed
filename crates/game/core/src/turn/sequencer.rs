//! The turn sequencer state machine.
//!
//! `RoundStart -> (per unit: TurnStart -> actions -> TurnEnd) -> RoundEnd ->
//! RoundStart ...` until a terminal outcome latches.
//!
//! Transitions are deferred: `end_turn` enqueues a pending transition and
//! [`TurnSequencer::drive`] drains the queue. A presentation layer can pace
//! the drain however it likes; headless tests drive it explicitly. Callers
//! therefore cannot assume `end_turn` synchronously starts the next turn.

use crate::effect::{self, TriggerPhase};
use crate::env::Env;
use crate::hooks::GameEvent;
use crate::state::{
    GameOutcome, GameState, PendingTransition, TurnFlags, TurnRecord, UnitId,
};

use super::economy;
use super::initiative::calculate_initiative_order;

/// Orchestrates turn and round transitions over borrowed game state.
///
/// The sequencer holds no state of its own beyond the collaborator
/// environment; everything it decides is written into [`GameState`], so it
/// can be constructed fresh for every drive step.
pub struct TurnSequencer<'a> {
    state: &'a mut GameState,
    env: Env<'a>,
}

impl<'a> TurnSequencer<'a> {
    pub fn new(state: &'a mut GameState, env: Env<'a>) -> Self {
        Self { state, env }
    }

    /// Read access to the underlying state for callers holding the sequencer.
    pub fn state(&self) -> &GameState {
        self.state
    }

    /// Begins the encounter: computes the first initiative order, fires the
    /// opening round-start triggers, and starts the first turn.
    pub fn start_encounter(&mut self) {
        if self.state.turn.is_over() {
            return;
        }
        self.state.turn.round = 1;
        self.state.turn.turn = 1;
        self.begin_round();
        self.state.turn.pending.push_back(PendingTransition::StartTurn);
        self.drive();
    }

    /// Requests the end of the acting unit's turn. The transition is
    /// deferred until [`drive`](Self::drive) runs.
    pub fn end_turn(&mut self) {
        if self.state.turn.is_over() {
            return;
        }
        self.state.turn.pending.push_back(PendingTransition::EndTurn);
    }

    /// Drains the pending transition queue until it is empty or the
    /// encounter ends.
    pub fn drive(&mut self) {
        while let Some(transition) = self.state.turn.pending.pop_front() {
            if self.state.turn.is_over() {
                self.state.turn.pending.clear();
                return;
            }
            match transition {
                PendingTransition::StartTurn => self.do_start_turn(),
                PendingTransition::EndTurn => self.do_end_turn(),
            }
        }
    }

    /// Spends action points for a unit. Fails without mutation when the
    /// amount exceeds the unit's current points.
    pub fn use_action_points(&mut self, unit: UnitId, amount: i32) -> bool {
        let mut events = Vec::new();
        let spent = economy::spend_action_points(self.state, unit, amount, &mut events);
        self.env.emit_all(&events, self.state);
        spent
    }

    /// Grants action points, clamped to the unit's maximum.
    pub fn add_action_points(&mut self, unit: UnitId, amount: i32) -> i32 {
        let mut events = Vec::new();
        let granted = economy::grant_action_points(self.state, unit, amount, &mut events);
        self.env.emit_all(&events, self.state);
        granted
    }

    // ========================================================================
    // Transition internals
    // ========================================================================

    /// Starts the turn of the unit at the current initiative index.
    ///
    /// Stale slots (defeated units lingering in the round's order) are
    /// skipped without firing triggers. An index past the end of the order
    /// runs the round boundary instead.
    fn do_start_turn(&mut self) {
        let unit_id = loop {
            if self.state.turn.initiative.is_empty() {
                tracing::warn!(
                    target: "tactics::turn",
                    round = self.state.turn.round,
                    "initiative order is empty, treating round as idle"
                );
                return;
            }
            if self.state.turn.index >= self.state.turn.initiative.len() {
                self.do_end_round();
                return;
            }
            let candidate = self.state.turn.initiative[self.state.turn.index];
            let alive = self
                .state
                .units
                .unit(candidate)
                .is_some_and(|unit| unit.is_alive());
            if alive {
                break candidate;
            }
            // Stale slot: skip without consuming a turn-start trigger.
            self.state.turn.index += 1;
        };

        let mut events = Vec::new();
        let (faction, name, action_points) = {
            let unit = self
                .state
                .units
                .unit_mut(unit_id)
                .expect("initiative slot resolved to a living unit");
            unit.flags = TurnFlags::empty();
            unit.resources.action_points = unit.stats.max_action_points;
            (unit.faction, unit.name.clone(), unit.resources.action_points)
        };
        self.state.turn.phase = faction.into();

        let regen = self.env.combat_params().energy_regen;
        if regen > 0
            && let Some(unit) = self.state.units.unit_mut(unit_id)
        {
            unit.resources.energy = (unit.resources.energy + regen).min(unit.stats.max_energy);
        }

        self.state.history.push(TurnRecord {
            unit: unit_id,
            turn: self.state.turn.turn,
            round: self.state.turn.round,
            action_points,
        });
        self.state.nonce += 1;

        // Prevention is sampled before the trigger cycle so a duration-1
        // stun costs exactly this turn even though the cycle removes it.
        let prevented = effect::prevents_action(self.state, &self.env, unit_id);

        effect::process_trigger(self.state, &self.env, unit_id, TriggerPhase::TurnStart, &mut events);

        events.push(GameEvent::TurnStarted {
            unit: unit_id,
            faction,
            turn: self.state.turn.turn,
            round: self.state.turn.round,
        });
        self.env.emit_all(&events, self.state);
        self.env.notify(&format!("{name}'s turn"), 800);

        let died_to_triggers = !self
            .state
            .units
            .unit(unit_id)
            .is_some_and(|unit| unit.is_alive());
        if prevented || died_to_triggers {
            if prevented {
                self.state.log_combat(format!("{name} cannot act"));
            }
            self.state.turn.pending.push_back(PendingTransition::EndTurn);
        }
    }

    /// Ends the acting unit's turn: fires turn-end triggers, ticks its
    /// ability cooldowns, and advances to the next initiative slot.
    fn do_end_turn(&mut self) {
        let mut events = Vec::new();

        if let Some(unit_id) = self.state.turn.current_unit() {
            let alive = self
                .state
                .units
                .unit(unit_id)
                .is_some_and(|unit| unit.is_alive());
            if alive {
                effect::process_trigger(
                    self.state,
                    &self.env,
                    unit_id,
                    TriggerPhase::TurnEnd,
                    &mut events,
                );
                if let Some(unit) = self.state.units.unit_mut(unit_id) {
                    unit.cooldowns.tick_down();
                }
                events.push(GameEvent::TurnEnded { unit: unit_id });
            }
        }
        self.env.emit_all(&events, self.state);

        self.state.turn.index += 1;
        self.state.turn.turn += 1;
        self.state.turn.pending.push_back(PendingTransition::StartTurn);
    }

    /// Runs the round boundary: round-end triggers, initiative
    /// recalculation, the game-over check, and round-start triggers.
    fn do_end_round(&mut self) {
        let mut events = Vec::new();
        let ending_round = self.state.turn.round;

        for unit_id in self.state.turn.initiative.clone() {
            effect::process_trigger(
                self.state,
                &self.env,
                unit_id,
                TriggerPhase::RoundEnd,
                &mut events,
            );
        }
        events.push(GameEvent::RoundEnded {
            round: ending_round,
        });
        self.env.emit_all(&events, self.state);

        self.state.turn.round += 1;
        self.state.turn.turn = 1;

        if self.check_game_over() {
            return;
        }

        self.begin_round();
        self.state.turn.pending.push_back(PendingTransition::StartTurn);
    }

    /// Recomputes initiative and fires round-start triggers.
    fn begin_round(&mut self) {
        let mut events = Vec::new();

        self.state.turn.initiative = calculate_initiative_order(self.state);
        self.state.turn.index = 0;
        if self.state.turn.initiative.is_empty() {
            tracing::warn!(
                target: "tactics::turn",
                round = self.state.turn.round,
                "no living units to order, round will idle"
            );
        }

        for unit_id in self.state.turn.initiative.clone() {
            effect::process_trigger(
                self.state,
                &self.env,
                unit_id,
                TriggerPhase::RoundStart,
                &mut events,
            );
        }
        events.push(GameEvent::RoundStarted {
            round: self.state.turn.round,
        });
        self.env.emit_all(&events, self.state);
    }

    /// Census-based game-over check. Latches the outcome once; returns true
    /// if the encounter is (or already was) over.
    fn check_game_over(&mut self) -> bool {
        if self.state.turn.is_over() {
            return true;
        }

        let players = self.state.units.living_count(crate::state::Faction::Player);
        let enemies = self.state.units.living_count(crate::state::Faction::Enemy);

        let outcome = match (players, enemies) {
            (0, 0) => Some(GameOutcome::Draw),
            (0, _) => Some(GameOutcome::EnemyWin),
            (_, 0) => Some(GameOutcome::PlayerWin),
            _ => None,
        };

        let Some(outcome) = outcome else {
            return false;
        };

        self.state.turn.outcome = Some(outcome);
        let text = match outcome {
            GameOutcome::PlayerWin => "Victory!",
            GameOutcome::EnemyWin => "Defeat...",
            GameOutcome::Draw => "Mutual destruction",
        };
        self.state.log_combat(text);
        self.env.notify(text, 2000);
        self.env
            .emit(&GameEvent::GameOver { outcome }, self.state);
        true
    }
}
