use std::fmt;

/// Unique identifier for any unit tracked in the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another position. Ranges, movement, and
    /// targeting all measure distance this way.
    pub fn manhattan_distance(&self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

/// Cardinal direction for direction-targeted abilities (charges, lines).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardinalDirection {
    North,
    South,
    East,
    West,
}

impl CardinalDirection {
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Unit step offset for this direction.
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }
}

/// Allegiance of a unit. Player units always act before enemy units within a
/// round; neutral units never count toward win/loss conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Faction {
    Player,
    Enemy,
    Neutral,
}

impl Faction {
    /// Sort rank for initiative ordering (player first).
    pub const fn initiative_rank(&self) -> u8 {
        match self {
            Self::Player => 0,
            Self::Enemy => 1,
            Self::Neutral => 2,
        }
    }

    /// The faction that wins when this faction is wiped out.
    pub const fn opponent(&self) -> Option<Faction> {
        match self {
            Self::Player => Some(Self::Enemy),
            Self::Enemy => Some(Self::Player),
            Self::Neutral => None,
        }
    }

    /// Returns true if the two factions are hostile to each other.
    pub fn is_hostile_to(&self, other: Faction) -> bool {
        matches!(
            (self, other),
            (Self::Player, Self::Enemy) | (Self::Enemy, Self::Player)
        )
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Player => "player",
            Self::Enemy => "enemy",
            Self::Neutral => "neutral",
        };
        f.write_str(name)
    }
}

/// Combat role of a unit. Classes drive initiative tiebreaks, the asymmetric
/// advantage table, experience awards, and class-locked abilities.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum UnitClass {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    Generic,
}

impl UnitClass {
    /// Fixed initiative tiebreak rank. Lower acts earlier.
    /// King > Queen > Rook > Bishop > Knight > Pawn, generics last.
    pub const fn priority_rank(&self) -> u8 {
        match self {
            Self::King => 0,
            Self::Queen => 1,
            Self::Rook => 2,
            Self::Bishop => 3,
            Self::Knight => 4,
            Self::Pawn => 5,
            Self::Generic => 6,
        }
    }

    /// Returns true if defeating this class ends the encounter for its
    /// faction (the king-equivalent rule).
    pub const fn is_king_equivalent(&self) -> bool {
        matches!(self, Self::King)
    }
}
