//! Fire-and-forget presentation sinks.
//!
//! The engine never blocks on these and never depends on their completion
//! for correctness. An absent sink is a silent no-op: presentation wiring is
//! legitimately missing in headless runs and tests.

use crate::state::UnitId;

/// One-way "show text for a duration" call used for player feedback.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, text: &str, duration_ms: u32);
}

/// One-way "play this visual for this actor/target" call.
pub trait AnimationSink: Send + Sync {
    fn play(&self, animation: &str, actor: UnitId, target: Option<UnitId>);
}
