//! The one read/write path for cell contents.
//! Reads fall through the overlay to the generator; writes only ever land in
//! the overlay, so generated values are shadowed and never modified.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use crate::config::{GameConfig, SpawnTable};
use crate::generator::generate;
use crate::overlay::MutationOverlay;
use crate::types::{CellCoord, CellValue, Token};

#[derive(Clone, Debug)]
pub struct World {
    seed: u32,
    spawn_table: SpawnTable,
    overlay: MutationOverlay,
}

impl World {
    pub fn new(seed: u32, spawn_table: SpawnTable) -> Self {
        Self { seed, spawn_table, overlay: MutationOverlay::new() }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.seed, config.spawn_table.clone())
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn get_cell_value(&self, coord: CellCoord) -> CellValue {
        match self.overlay.get(coord) {
            Some(value) => value,
            None => self.base_value(coord),
        }
    }

    pub fn set_cell_value(&mut self, coord: CellCoord, value: CellValue) {
        self.overlay.set(coord, value);
    }

    /// Generator output, ignoring any player changes.
    pub fn base_value(&self, coord: CellCoord) -> CellValue {
        generate(coord, self.seed, &self.spawn_table)
    }

    pub fn overlay(&self) -> &MutationOverlay {
        &self.overlay
    }

    pub fn replace_overlay(&mut self, overlay: MutationOverlay) {
        self.overlay = overlay;
    }

    pub fn clear_overlay(&mut self) {
        self.overlay.clear();
    }

    /// Fingerprint of the seed and every overlay entry.
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u32(self.seed);
        hasher.write_u64(self.overlay.len() as u64);
        for (coord, value) in self.overlay.entries() {
            hasher.write_i32(coord.i);
            hasher.write_i32(coord.j);
            hasher.write_u32(value.map_or(0, Token::value));
        }
        hasher.finish()
    }
}

/// Renders a snapshot hash as fixed-width lowercase hex, e.g. `0x00000000000000ff`.
pub fn format_snapshot_hash(hash: u64) -> String {
    format!("0x{hash:016x}")
}
