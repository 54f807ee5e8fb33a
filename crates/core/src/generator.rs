//! Deterministic base tokens for every cell of the infinite lattice.
//! Pure functions of `(coord, seed, table)`; nothing here holds state.

use crate::config::SpawnTable;
use crate::types::{CellCoord, CellValue, Token};

const I_FACTOR: u32 = 374_761_393;
const J_FACTOR: u32 = 668_265_263;
const AVALANCHE_FACTOR: u32 = 1_274_126_177;
/// Perturbation applied to both axes for the value draw.
const VALUE_DRAW_SALT: i32 = 0x9e37;

/// 32-bit hash of a cell and seed with a multiply-xorshift finalizer.
pub fn hash32(i: i32, j: i32, seed: u32) -> u32 {
    let mut h = (i as u32).wrapping_mul(I_FACTOR) ^ (j as u32).wrapping_mul(J_FACTOR) ^ seed;
    h = (h ^ (h >> 13)).wrapping_mul(AVALANCHE_FACTOR);
    h ^ (h >> 16)
}

/// Maps a hash onto `[0, 1)`.
pub fn unit_interval(hash: u32) -> f64 {
    f64::from(hash) / 4_294_967_296.0
}

/// Base token of a cell before any player interaction.
pub fn generate(coord: CellCoord, seed: u32, table: &SpawnTable) -> CellValue {
    let presence = unit_interval(hash32(coord.i, coord.j, seed));
    if presence < table.empty_below {
        return None;
    }

    let draw =
        unit_interval(hash32(coord.i ^ VALUE_DRAW_SALT, coord.j ^ VALUE_DRAW_SALT, seed));
    let bucket = table
        .buckets
        .iter()
        .find(|bucket| draw < bucket.below)
        .or_else(|| table.buckets.last())?;
    Token::new(bucket.value)
}
