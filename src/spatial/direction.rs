//! Eight-way compass directions on a y-down pixel grid

use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the eight compass directions
///
/// Offsets are `[dx, dy]` with `y` growing downwards, so `North` is one row up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// `[0, -1]`
    North,
    /// `[1, -1]`
    NorthEast,
    /// `[1, 0]`
    East,
    /// `[1, 1]`
    SouthEast,
    /// `[0, 1]`
    South,
    /// `[-1, 1]`
    SouthWest,
    /// `[-1, 0]`
    West,
    /// `[-1, -1]`
    NorthWest,
}

impl Direction {
    /// All directions in clockwise order starting at `North`
    pub const ALL: [Self; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// Position in [`Direction::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Unit offset `[dx, dy]`
    pub const fn offset(self) -> [i32; 2] {
        match self {
            Self::North => [0, -1],
            Self::NorthEast => [1, -1],
            Self::East => [1, 0],
            Self::SouthEast => [1, 1],
            Self::South => [0, 1],
            Self::SouthWest => [-1, 1],
            Self::West => [-1, 0],
            Self::NorthWest => [-1, -1],
        }
    }

    /// Direction whose offset is `[dx, dy]`, if any
    ///
    /// Only the eight unit offsets map to a direction; `[0, 0]` and anything
    /// further away yield `None`.
    pub const fn from_offset(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Self::North),
            (1, -1) => Some(Self::NorthEast),
            (1, 0) => Some(Self::East),
            (1, 1) => Some(Self::SouthEast),
            (0, 1) => Some(Self::South),
            (-1, 1) => Some(Self::SouthWest),
            (-1, 0) => Some(Self::West),
            (-1, -1) => Some(Self::NorthWest),
            _ => None,
        }
    }

    /// The direction pointing the other way
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::NorthEast => Self::SouthWest,
            Self::East => Self::West,
            Self::SouthEast => Self::NorthWest,
            Self::South => Self::North,
            Self::SouthWest => Self::NorthEast,
            Self::West => Self::East,
            Self::NorthWest => Self::SouthEast,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "N",
            Self::NorthEast => "NE",
            Self::East => "E",
            Self::SouthEast => "SE",
            Self::South => "S",
            Self::SouthWest => "SW",
            Self::West => "W",
            Self::NorthWest => "NW",
        };
        f.write_str(name)
    }
}

/// A value for every direction
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectionMap<T> {
    values: [T; 8],
}

impl<T> DirectionMap<T> {
    /// Build a map by evaluating `f` for each direction
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Direction) -> T,
    {
        Self {
            values: Direction::ALL.map(&mut f),
        }
    }

    /// Iterate `(direction, value)` pairs in [`Direction::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &T)> + '_ {
        Direction::ALL.into_iter().zip(self.values.iter())
    }
}

impl<T> Index<Direction> for DirectionMap<T> {
    type Output = T;

    // Eight variants, eight slots
    #[allow(clippy::indexing_slicing)]
    fn index(&self, direction: Direction) -> &T {
        &self.values[direction.index()]
    }
}

impl<T> IndexMut<Direction> for DirectionMap<T> {
    #[allow(clippy::indexing_slicing)]
    fn index_mut(&mut self, direction: Direction) -> &mut T {
        &mut self.values[direction.index()]
    }
}
