//! Turn sequencing.
//!
//! Decides unit order, gates the per-unit action-point economy, and emits
//! lifecycle triggers that the effect engine, resolver, and observers
//! consume.

mod initiative;
mod sequencer;

pub use initiative::calculate_initiative_order;
pub use sequencer::TurnSequencer;

/// Per-unit action point economy.
///
/// These free functions are the single mutation path for action points, so
/// the resolver and ability executor share the sequencer's accounting. One
/// unit spending points never affects another's budget.
pub mod economy {
    use crate::hooks::GameEvent;
    use crate::state::{GameState, UnitId};

    /// Spends action points. Fails without mutation when the unit is
    /// missing or cannot afford the amount.
    pub fn spend_action_points(
        state: &mut GameState,
        unit_id: UnitId,
        amount: i32,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if amount < 0 {
            return false;
        }
        let Some(unit) = state.units.unit_mut(unit_id) else {
            return false;
        };
        if unit.resources.action_points < amount {
            return false;
        }
        unit.resources.action_points -= amount;
        let current = unit.resources.action_points;
        events.push(GameEvent::ActionPointsChanged {
            unit: unit_id,
            current,
        });
        true
    }

    /// Grants action points, clamped to the unit's maximum. Returns the
    /// amount actually granted.
    pub fn grant_action_points(
        state: &mut GameState,
        unit_id: UnitId,
        amount: i32,
        events: &mut Vec<GameEvent>,
    ) -> i32 {
        let Some(unit) = state.units.unit_mut(unit_id) else {
            return 0;
        };
        let headroom = (unit.stats.max_action_points - unit.resources.action_points).max(0);
        let granted = amount.clamp(0, headroom);
        unit.resources.action_points += granted;
        let current = unit.resources.action_points;
        if granted > 0 {
            events.push(GameEvent::ActionPointsChanged {
                unit: unit_id,
                current,
            });
        }
        granted
    }
}

#[cfg(test)]
mod tests {
    use super::economy;
    use crate::state::{Faction, GameState, Position, UnitClass, UnitStats};

    #[test]
    fn overspending_leaves_action_points_unchanged() {
        let mut state = GameState::default();
        let unit = state
            .spawn_unit(
                "Footman",
                UnitClass::Pawn,
                Faction::Player,
                Position::ORIGIN,
                UnitStats::default(),
            )
            .unwrap();
        let mut events = Vec::new();
        let before = state.units.unit(unit).unwrap().resources.action_points;

        assert!(!economy::spend_action_points(
            &mut state,
            unit,
            before + 1,
            &mut events
        ));
        assert_eq!(
            state.units.unit(unit).unwrap().resources.action_points,
            before
        );
        assert!(events.is_empty());
    }

    #[test]
    fn grants_clamp_to_the_unit_maximum() {
        let mut state = GameState::default();
        let unit = state
            .spawn_unit(
                "Footman",
                UnitClass::Pawn,
                Faction::Player,
                Position::ORIGIN,
                UnitStats::default(),
            )
            .unwrap();
        let mut events = Vec::new();

        economy::spend_action_points(&mut state, unit, 1, &mut events);
        let granted = economy::grant_action_points(&mut state, unit, 10, &mut events);
        assert_eq!(granted, 1);

        let resources = state.units.unit(unit).unwrap().resources;
        assert_eq!(resources.action_points, UnitStats::default().max_action_points);
    }

    #[test]
    fn spending_is_unit_scoped() {
        let mut state = GameState::default();
        let first = state
            .spawn_unit(
                "Footman",
                UnitClass::Pawn,
                Faction::Player,
                Position::new(0, 0),
                UnitStats::default(),
            )
            .unwrap();
        let second = state
            .spawn_unit(
                "Grunt",
                UnitClass::Pawn,
                Faction::Enemy,
                Position::new(1, 0),
                UnitStats::default(),
            )
            .unwrap();
        let mut events = Vec::new();

        assert!(economy::spend_action_points(&mut state, first, 2, &mut events));
        assert_eq!(
            state.units.unit(second).unwrap().resources.action_points,
            UnitStats::default().max_action_points
        );
    }
}
