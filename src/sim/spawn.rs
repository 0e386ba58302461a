/// Tile spawning: the only source of new values on the board.
///
/// Picks one empty cell uniformly and drops a 2 (90%) or a 4 (10%) there.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::grid::Grid;

/// Out of ten draws, this many yield a 2.
const TWO_WEIGHT: u32 = 9;

pub fn random_tile_value<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    if rng.gen_range(0..10) < TWO_WEIGHT { 2 } else { 4 }
}

/// Place one random tile. Returns `(row, col, value)`, or `None` when full.
pub fn spawn_tile<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Option<(usize, usize, u32)> {
    let empty = grid.empty_cells();
    let &(r, c) = empty.choose(rng)?;
    let value = random_tile_value(rng);
    grid.set(r, c, value);
    Some((r, c, value))
}
