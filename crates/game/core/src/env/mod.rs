//! Traits describing the engine's external collaborators.
//!
//! Oracles expose balance tables, catalogs, and randomness; sinks accept
//! fire-and-forget presentation calls. The [`Env`] aggregate bundles them so
//! the engine can access everything it needs without hard coupling to
//! concrete implementations, and so a missing collaborator degrades to a
//! logged warning instead of a crash.

mod error;
mod rng;
mod sinks;
mod tables;

pub use error::OracleError;
pub use rng::{PcgRng, RngOracle, compute_seed, roll};
pub use sinks::{AnimationSink, NotificationSink};
pub use tables::{CombatParams, DefaultTables, TablesOracle};

use crate::ability::AbilityOracle;
use crate::effect::EffectOracle;
use crate::hooks::{GameEvent, HookRegistry};
use crate::state::{GameState, UnitId};

/// Aggregates the collaborators required by the sequencer, resolver, effect
/// engine, and ability executor.
///
/// Every reference is optional. Rules-critical collaborators (tables,
/// catalogs, rng) surface `OracleError` through `Result` accessors so
/// callers can degrade explicitly; presentation collaborators (sinks, hooks)
/// are feature-detected and silently skipped when absent.
#[derive(Clone, Copy, Default)]
pub struct Env<'a> {
    tables: Option<&'a dyn TablesOracle>,
    effects: Option<&'a dyn EffectOracle>,
    abilities: Option<&'a dyn AbilityOracle>,
    rng: Option<&'a dyn RngOracle>,
    notifier: Option<&'a dyn NotificationSink>,
    animator: Option<&'a dyn AnimationSink>,
    hooks: Option<&'a HookRegistry>,
}

impl<'a> Env<'a> {
    /// An environment with no collaborators. Everything degrades.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_tables(mut self, tables: &'a dyn TablesOracle) -> Self {
        self.tables = Some(tables);
        self
    }

    pub fn with_effects(mut self, effects: &'a dyn EffectOracle) -> Self {
        self.effects = Some(effects);
        self
    }

    pub fn with_abilities(mut self, abilities: &'a dyn AbilityOracle) -> Self {
        self.abilities = Some(abilities);
        self
    }

    pub fn with_rng(mut self, rng: &'a dyn RngOracle) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn with_notifier(mut self, notifier: &'a dyn NotificationSink) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_animator(mut self, animator: &'a dyn AnimationSink) -> Self {
        self.animator = Some(animator);
        self
    }

    pub fn with_hooks(mut self, hooks: &'a HookRegistry) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Returns the TablesOracle, or an error if not available.
    pub fn tables(&self) -> Result<&'a dyn TablesOracle, OracleError> {
        self.tables.ok_or(OracleError::TablesNotAvailable)
    }

    /// Returns the EffectOracle, or an error if not available.
    pub fn effects(&self) -> Result<&'a dyn EffectOracle, OracleError> {
        self.effects.ok_or(OracleError::EffectsNotAvailable)
    }

    /// Returns the AbilityOracle, or an error if not available.
    pub fn abilities(&self) -> Result<&'a dyn AbilityOracle, OracleError> {
        self.abilities.ok_or(OracleError::AbilitiesNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    pub fn rng(&self) -> Result<&'a dyn RngOracle, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    /// Returns the RngOracle, falling back to the built-in PCG generator.
    ///
    /// The fallback keeps roll resolution deterministic in headless runs
    /// where no oracle was wired.
    pub fn rng_or_default(&self) -> &'a dyn RngOracle {
        static FALLBACK: PcgRng = PcgRng;
        self.rng.unwrap_or(&FALLBACK)
    }

    /// Returns the TablesOracle, falling back to the built-in balance tables.
    pub fn tables_or_default(&self) -> &'a dyn TablesOracle {
        static FALLBACK: DefaultTables = DefaultTables;
        self.tables.unwrap_or(&FALLBACK)
    }

    /// Combat parameters, falling back to defaults when no tables oracle is
    /// wired. The fallback keeps headless tests running and is logged at
    /// debug level.
    pub fn combat_params(&self) -> CombatParams {
        match self.tables {
            Some(tables) => tables.combat(),
            None => {
                tracing::debug!(target: "tactics::env", "tables oracle missing, using default combat params");
                CombatParams::default()
            }
        }
    }

    /// Sends a notification if a sink is wired; silent no-op otherwise.
    pub fn notify(&self, text: &str, duration_ms: u32) {
        if let Some(notifier) = self.notifier {
            notifier.notify(text, duration_ms);
        }
    }

    /// Plays an animation if a sink is wired; silent no-op otherwise.
    pub fn animate(&self, animation: &str, actor: UnitId, target: Option<UnitId>) {
        if let Some(animator) = self.animator {
            animator.play(animation, actor, target);
        }
    }

    /// Dispatches an event to the hook registry if one is wired.
    ///
    /// Hook failures are handled by the registry's criticality policy; the
    /// engine itself never fails because an observer did.
    pub fn emit(&self, event: &GameEvent, state: &GameState) {
        if let Some(hooks) = self.hooks {
            hooks.dispatch(event, state);
        }
    }

    /// Dispatches a batch of events in order.
    pub fn emit_all(&self, events: &[GameEvent], state: &GameState) {
        for event in events {
            self.emit(event, state);
        }
    }
}

impl std::fmt::Debug for Env<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("tables", &self.tables.is_some())
            .field("effects", &self.effects.is_some())
            .field("abilities", &self.abilities.is_some())
            .field("rng", &self.rng.is_some())
            .field("notifier", &self.notifier.is_some())
            .field("animator", &self.animator.is_some())
            .field("hooks", &self.hooks.is_some())
            .finish()
    }
}
