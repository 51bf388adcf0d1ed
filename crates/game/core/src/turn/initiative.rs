//! Initiative ordering.

use crate::state::{GameState, UnitId};

/// Computes the acting order for a round from the living units.
///
/// Sort keys, in order:
/// 1. faction - player units precede enemy units (neutrals last)
/// 2. initiative stat, descending
/// 3. fixed class priority (king > queen > rook > bishop > knight > pawn)
/// 4. unit id, as a final total-order tiebreak
///
/// The sort is stable and fully keyed, so the order is deterministic for a
/// fixed unit set. Recomputed only at round boundaries; never mutated
/// mid-round.
pub fn calculate_initiative_order(state: &GameState) -> Vec<UnitId> {
    let mut living: Vec<_> = state.units.living().collect();
    living.sort_by_key(|unit| {
        (
            unit.faction.initiative_rank(),
            std::cmp::Reverse(unit.stats.initiative),
            unit.class.priority_rank(),
            unit.id,
        )
    });
    living.into_iter().map(|unit| unit.id).collect()
}
