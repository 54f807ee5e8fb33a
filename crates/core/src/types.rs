use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Integer address of one lattice cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellCoord {
    pub i: i32,
    pub j: i32,
}

impl CellCoord {
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// Chessboard distance in cell units.
    pub fn chebyshev(self, other: Self) -> u32 {
        self.i.abs_diff(other.i).max(self.j.abs_diff(other.j))
    }

    pub fn offset(self, direction: Direction) -> Self {
        let (di, dj) = direction.delta();
        Self { i: self.i.wrapping_add(di), j: self.j.wrapping_add(dj) }
    }
}

/// Canonical `"i,j"` key, shared by the overlay and the save blob.
impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("malformed cell key '{0}'")]
pub struct CellKeyError(pub String);

impl FromStr for CellCoord {
    type Err = CellKeyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = || CellKeyError(raw.to_string());
        let (i, j) = raw.split_once(',').ok_or_else(malformed)?;
        let i = i.trim().parse::<i32>().map_err(|_| malformed())?;
        let j = j.trim().parse::<i32>().map_err(|_| malformed())?;
        Ok(Self { i, j })
    }
}

/// A token carried by a cell or by the player. Always positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(u32);

impl Token {
    pub const fn new(value: u32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// Result of merging two equal tokens, `None` on overflow.
    pub fn doubled(self) -> Option<Self> {
        self.0.checked_mul(2).map(Self)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content of a cell: a token or nothing.
pub type CellValue = Option<Token>;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// `(di, dj)`: `i` follows latitude, `j` follows longitude.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (1, 0),
            Self::South => (-1, 0),
            Self::East => (0, 1),
            Self::West => (0, -1),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementMode {
    #[default]
    Buttons,
    Geolocation,
}
