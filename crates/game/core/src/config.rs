/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Width of the battle grid in tiles.
    pub grid_width: i32,
    /// Height of the battle grid in tiles.
    pub grid_height: i32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of units alive in one encounter.
    pub const MAX_UNITS: usize = 64;
    /// Maximum number of simultaneous status effects per unit.
    pub const MAX_STATUS_EFFECTS: usize = 8;
    /// Maximum number of abilities (and therefore cooldown slots) per unit.
    pub const MAX_ABILITIES: usize = 8;
    /// Combat log ring-buffer capacity; oldest entries are dropped past this.
    pub const COMBAT_LOG_CAPACITY: usize = 50;
    /// Rolling turn-history capacity for replay inspection.
    pub const TURN_HISTORY_CAPACITY: usize = 10;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_GRID_WIDTH: i32 = 8;
    pub const DEFAULT_GRID_HEIGHT: i32 = 8;

    pub fn new() -> Self {
        Self {
            grid_width: Self::DEFAULT_GRID_WIDTH,
            grid_height: Self::DEFAULT_GRID_HEIGHT,
        }
    }

    pub fn with_grid(grid_width: i32, grid_height: i32) -> Self {
        Self {
            grid_width,
            grid_height,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
