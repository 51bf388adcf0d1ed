//! Lifecycle events and the hook registry.
//!
//! Hooks are the engine's observer seam: UI panels, HUD state, notification
//! routing, and AI dispatch all register here instead of wrapping engine
//! functions. The registry invokes hooks itself, in priority order, at each
//! named lifecycle edge.
//!
//! Hooks observe state; they never mutate it. A hook that wants to act (an
//! AI deciding a move) records its decision and feeds it back through the
//! public engine API on the next drive step.

use std::sync::Arc;

use crate::state::{Faction, GameOutcome, GameState, Position, UnitClass, UnitId};

/// High-level occurrences in the encounter, dispatched to registered hooks
/// after the corresponding state mutation completes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A round began (after initiative recalculation).
    RoundStarted { round: u32 },

    /// A round completed.
    RoundEnded { round: u32 },

    /// A unit's turn began. AI collaborators use this to schedule a decision
    /// for enemy-faction units.
    TurnStarted {
        unit: UnitId,
        faction: Faction,
        turn: u32,
        round: u32,
    },

    /// A unit's turn ended.
    TurnEnded { unit: UnitId },

    /// An attack resolved (hit or miss).
    AttackResolved {
        attacker: UnitId,
        defender: UnitId,
        damage: i32,
        missed: bool,
        critical: bool,
    },

    /// A unit took damage from any source.
    DamageApplied {
        unit: UnitId,
        amount: i32,
        source: Option<UnitId>,
    },

    /// A unit was healed; `amount` is the actual (possibly clamped) value.
    HealingApplied { unit: UnitId, amount: i32 },

    /// A status effect was applied or refreshed.
    EffectApplied { unit: UnitId, effect_name: &'static str },

    /// A status effect expired or was removed.
    EffectRemoved { unit: UnitId, effect_name: &'static str },

    /// An ability was successfully executed.
    AbilityUsed { unit: UnitId, ability_name: &'static str },

    /// A unit's action points changed.
    ActionPointsChanged { unit: UnitId, current: i32 },

    /// A unit moved to a new grid position.
    UnitMoved {
        unit: UnitId,
        from: Position,
        to: Position,
    },

    /// A unit was defeated and removed from the grid.
    UnitDefeated {
        unit: UnitId,
        class: UnitClass,
        position: Option<Position>,
        killer: Option<UnitId>,
    },

    /// The terminal outcome was latched.
    GameOver { outcome: GameOutcome },
}

/// Defines the criticality level of a hook for error handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookCriticality {
    /// Hook failure is logged as an error. Use for collaborators whose
    /// absence of effect matters (AI dispatch, HUD state).
    Important,

    /// Hook failure is expected and can be silently ignored. Use for
    /// cosmetic observers (sounds, achievements).
    Optional,
}

/// Error surfaced by a hook implementation.
#[derive(Clone, Debug, thiserror::Error)]
#[error("hook failed: {reason}")]
pub struct HookError {
    pub reason: String,
}

impl HookError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// An observer registered against engine lifecycle events.
pub trait Hook: Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Dispatch priority; lower values run first.
    fn priority(&self) -> i32 {
        0
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Important
    }

    /// Handles one event. The state reference reflects the world after the
    /// event's mutation.
    fn handle(&self, event: &GameEvent, state: &GameState) -> Result<(), HookError>;
}

/// Registry that manages and executes lifecycle hooks.
///
/// Hooks are sorted by priority at registration time, so dispatch order is
/// fixed and observable in tests.
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<Arc<dyn Hook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook, keeping the list sorted by priority.
    pub fn register(&mut self, hook: Arc<dyn Hook>) {
        self.hooks.push(hook);
        self.hooks.sort_by_key(|h| h.priority());
    }

    /// Executes all hooks for the given event in priority order.
    ///
    /// # Error Handling
    ///
    /// Hook failures never propagate into the engine:
    /// - `Important`: logged at error level, dispatch continues
    /// - `Optional`: logged at debug level, dispatch continues
    pub fn dispatch(&self, event: &GameEvent, state: &GameState) {
        for hook in &self.hooks {
            if let Err(error) = hook.handle(event, state) {
                match hook.criticality() {
                    HookCriticality::Important => tracing::error!(
                        target: "tactics::hooks",
                        hook = hook.name(),
                        error = %error,
                        "hook failed, continuing"
                    ),
                    HookCriticality::Optional => tracing::debug!(
                        target: "tactics::hooks",
                        hook = hook.name(),
                        error = %error,
                        "optional hook failed"
                    ),
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Returns an iterator over hook names and priorities (for debugging).
    pub fn hooks(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.hooks.iter().map(|h| (h.name(), h.priority()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        name: &'static str,
        order: i32,
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Hook for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.order
        }

        fn handle(&self, _event: &GameEvent, _state: &GameState) -> Result<(), HookError> {
            self.seen.lock().unwrap().push(self.name);
            Ok(())
        }
    }

    #[test]
    fn hooks_dispatch_in_priority_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::new();
        registry.register(Arc::new(Recorder {
            name: "second",
            order: 10,
            seen: Arc::clone(&seen),
        }));
        registry.register(Arc::new(Recorder {
            name: "first",
            order: -5,
            seen: Arc::clone(&seen),
        }));

        let state = GameState::default();
        registry.dispatch(&GameEvent::RoundStarted { round: 1 }, &state);

        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    struct Failing;

    impl Hook for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn criticality(&self) -> HookCriticality {
            HookCriticality::Optional
        }

        fn handle(&self, _event: &GameEvent, _state: &GameState) -> Result<(), HookError> {
            Err(HookError::new("intentional"))
        }
    }

    #[test]
    fn failing_hook_does_not_stop_dispatch() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::new();
        registry.register(Arc::new(Failing));
        registry.register(Arc::new(Recorder {
            name: "after",
            order: 1,
            seen: Arc::clone(&seen),
        }));

        let state = GameState::default();
        registry.dispatch(&GameEvent::RoundEnded { round: 1 }, &state);

        assert_eq!(*seen.lock().unwrap(), vec!["after"]);
    }
}
