//! Lattice addressing: geographic positions to cells, cells to geometry.
//! Every conversion floors, so the partition of the plane is total and each
//! position belongs to exactly one cell.

use crate::config::GameConfig;
use crate::types::{CellCoord, Direction, LatLng};

/// Axis-aligned geographic rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    pub const fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self { south, west, north, east }
    }

    pub fn center(&self) -> LatLng {
        LatLng::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }

    fn corners(&self) -> [LatLng; 4] {
        [
            LatLng::new(self.south, self.west),
            LatLng::new(self.south, self.east),
            LatLng::new(self.north, self.west),
            LatLng::new(self.north, self.east),
        ]
    }
}

/// Inclusive rectangle of cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellRect {
    pub i_min: i32,
    pub i_max: i32,
    pub j_min: i32,
    pub j_max: i32,
}

impl CellRect {
    pub fn contains(&self, coord: CellCoord) -> bool {
        (self.i_min..=self.i_max).contains(&coord.i) && (self.j_min..=self.j_max).contains(&coord.j)
    }

    pub fn cell_count(&self) -> u64 {
        let rows = u64::from(self.i_max.abs_diff(self.i_min)) + 1;
        let cols = u64::from(self.j_max.abs_diff(self.j_min)) + 1;
        rows.saturating_mul(cols)
    }

    /// Row-major walk over every cell in the rectangle.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + use<> {
        let (j_min, j_max) = (self.j_min, self.j_max);
        (self.i_min..=self.i_max)
            .flat_map(move |i| (j_min..=j_max).map(move |j| CellCoord::new(i, j)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lattice {
    cell_size_deg: f64,
    origin: LatLng,
}

impl Lattice {
    pub const fn new(cell_size_deg: f64, origin: LatLng) -> Self {
        Self { cell_size_deg, origin }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.cell_size_deg, config.origin)
    }

    pub const fn cell_size_deg(&self) -> f64 {
        self.cell_size_deg
    }

    pub fn cell_of(&self, position: LatLng) -> CellCoord {
        CellCoord::new(
            floor_quantum(position.lat - self.origin.lat, self.cell_size_deg),
            floor_quantum(position.lng - self.origin.lng, self.cell_size_deg),
        )
    }

    pub fn cell_bounds(&self, coord: CellCoord) -> GeoBounds {
        let south = self.origin.lat + f64::from(coord.i) * self.cell_size_deg;
        let west = self.origin.lng + f64::from(coord.j) * self.cell_size_deg;
        GeoBounds::new(south, west, south + self.cell_size_deg, west + self.cell_size_deg)
    }

    /// Smallest rectangle of cells covering every corner of `bounds`.
    pub fn covering_rect(&self, bounds: &GeoBounds) -> CellRect {
        let cells = bounds.corners().map(|corner| self.cell_of(corner));
        let mut rect = CellRect {
            i_min: cells[0].i,
            i_max: cells[0].i,
            j_min: cells[0].j,
            j_max: cells[0].j,
        };
        for cell in &cells[1..] {
            rect.i_min = rect.i_min.min(cell.i);
            rect.i_max = rect.i_max.max(cell.i);
            rect.j_min = rect.j_min.min(cell.j);
            rect.j_max = rect.j_max.max(cell.j);
        }
        rect
    }

    /// Moves a position by exactly one cell edge.
    pub fn step(&self, position: LatLng, direction: Direction) -> LatLng {
        let (di, dj) = direction.delta();
        LatLng::new(
            position.lat + f64::from(di) * self.cell_size_deg,
            position.lng + f64::from(dj) * self.cell_size_deg,
        )
    }
}

fn floor_quantum(offset: f64, quantum: f64) -> i32 {
    // `as` saturates out-of-range floats and maps NaN to zero.
    (offset / quantum).floor() as i32
}
