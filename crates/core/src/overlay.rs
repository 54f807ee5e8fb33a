//! Sparse record of player-made changes to the generated world.

use std::collections::BTreeMap;

use crate::types::{CellCoord, CellValue};

/// Cells the player has touched. A present entry shadows the generator
/// forever, including entries that hold no token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MutationOverlay {
    entries: BTreeMap<CellCoord, CellValue>,
}

impl MutationOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` means the cell was never touched; `Some(None)` means it was emptied.
    pub fn get(&self, coord: CellCoord) -> Option<CellValue> {
        self.entries.get(&coord).copied()
    }

    pub fn set(&mut self, coord: CellCoord, value: CellValue) {
        self.entries.insert(coord, value);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in coordinate order.
    pub fn entries(&self) -> impl Iterator<Item = (CellCoord, CellValue)> + '_ {
        self.entries.iter().map(|(coord, value)| (*coord, *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(CellCoord, CellValue)> for MutationOverlay {
    fn from_iter<I: IntoIterator<Item = (CellCoord, CellValue)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}
