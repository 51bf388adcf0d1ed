//! Grid occupancy state.
//!
//! The grid is the one resource mutated by several components (movement,
//! defeat removal, swaps). Every spatial mutation goes through
//! [`GridState::place_unit`], [`GridState::remove_unit`],
//! [`GridState::move_unit`], or [`GridState::swap_units`] so the logical
//! position on the unit and the spatial lookup can never desynchronize.

use std::collections::BTreeMap;

use super::common::{Position, UnitId};

/// Static grid dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridBounds {
    pub width: i32,
    pub height: i32,
}

impl GridBounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns true if the position lies inside the grid.
    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0 && position.y >= 0 && position.x < self.width && position.y < self.height
    }
}

/// Dynamic occupancy layered over the static bounds. One occupant per tile.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridState {
    bounds: GridBounds,
    occupancy: BTreeMap<Position, UnitId>,
}

impl GridState {
    pub fn new(bounds: GridBounds) -> Self {
        Self {
            bounds,
            occupancy: BTreeMap::new(),
        }
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Returns true if the position is inside the grid bounds.
    pub fn is_valid_position(&self, position: Position) -> bool {
        self.bounds.contains(position)
    }

    /// Unit occupying a position, if any.
    pub fn unit_at(&self, position: Position) -> Option<UnitId> {
        self.occupancy.get(&position).copied()
    }

    /// Returns true if the position is inside bounds and unoccupied.
    pub fn is_free(&self, position: Position) -> bool {
        self.is_valid_position(position) && !self.occupancy.contains_key(&position)
    }

    /// Places a unit on an empty, in-bounds tile.
    pub fn place_unit(&mut self, unit: UnitId, position: Position) -> bool {
        if !self.is_free(position) {
            return false;
        }
        self.occupancy.insert(position, unit);
        true
    }

    /// Removes a unit from the grid. Returns its last position.
    pub fn remove_unit(&mut self, unit: UnitId) -> Option<Position> {
        let position = self
            .occupancy
            .iter()
            .find_map(|(pos, &id)| (id == unit).then_some(*pos))?;
        self.occupancy.remove(&position);
        Some(position)
    }

    /// Moves a unit to an empty, in-bounds tile.
    pub fn move_unit(&mut self, unit: UnitId, to: Position) -> bool {
        if !self.is_free(to) {
            return false;
        }
        let Some(from) = self
            .occupancy
            .iter()
            .find_map(|(pos, &id)| (id == unit).then_some(*pos))
        else {
            return false;
        };
        self.occupancy.remove(&from);
        self.occupancy.insert(to, unit);
        true
    }

    /// Exchanges the positions of two units already on the grid.
    pub fn swap_units(&mut self, a: UnitId, b: UnitId) -> bool {
        let pos_a = self
            .occupancy
            .iter()
            .find_map(|(pos, &id)| (id == a).then_some(*pos));
        let pos_b = self
            .occupancy
            .iter()
            .find_map(|(pos, &id)| (id == b).then_some(*pos));
        let (Some(pos_a), Some(pos_b)) = (pos_a, pos_b) else {
            return false;
        };
        self.occupancy.insert(pos_a, b);
        self.occupancy.insert(pos_b, a);
        true
    }

    /// Iterates occupied tiles in position order.
    pub fn occupancy(&self) -> impl Iterator<Item = (Position, UnitId)> + '_ {
        self.occupancy.iter().map(|(pos, &id)| (*pos, id))
    }
}

impl Default for GridState {
    fn default() -> Self {
        Self::new(GridBounds::new(
            crate::config::GameConfig::DEFAULT_GRID_WIDTH,
            crate::config::GameConfig::DEFAULT_GRID_HEIGHT,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_and_move_respect_occupancy() {
        let mut grid = GridState::new(GridBounds::new(4, 4));
        assert!(grid.place_unit(UnitId(1), Position::new(0, 0)));
        assert!(grid.place_unit(UnitId(2), Position::new(1, 0)));

        // Occupied destination
        assert!(!grid.move_unit(UnitId(1), Position::new(1, 0)));
        // Out of bounds
        assert!(!grid.move_unit(UnitId(1), Position::new(4, 0)));

        assert!(grid.move_unit(UnitId(1), Position::new(0, 1)));
        assert_eq!(grid.unit_at(Position::new(0, 1)), Some(UnitId(1)));
        assert_eq!(grid.unit_at(Position::new(0, 0)), None);
    }

    #[test]
    fn swap_exchanges_positions() {
        let mut grid = GridState::new(GridBounds::new(4, 4));
        grid.place_unit(UnitId(1), Position::new(0, 0));
        grid.place_unit(UnitId(2), Position::new(3, 3));

        assert!(grid.swap_units(UnitId(1), UnitId(2)));
        assert_eq!(grid.unit_at(Position::new(0, 0)), Some(UnitId(2)));
        assert_eq!(grid.unit_at(Position::new(3, 3)), Some(UnitId(1)));
    }
}
