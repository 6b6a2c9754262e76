//! Random placement of tiles, number tokens and harbors.
//!
//! Every pool is dealt without replacement by rejection resampling: draw a
//! uniform index over the whole pool and draw again if that element was
//! already dealt. The generator only fills the board; whether the result is
//! fair is up to [`crate::validation`].

use crate::board::Board;
use crate::tile::{Landscape, Tile};
use crate::topology::Topology;
use rand::Rng;
use std::sync::Arc;
use tracing::trace;

/// Produce one candidate board for `topology`.
///
/// Deterministic for a given RNG state; never fails.
pub fn generate<R: Rng + ?Sized>(topology: &Arc<Topology>, rng: &mut R) -> Board {
    let mut tiles = deal_landscapes(topology, rng);
    deal_numbers(topology, &mut tiles, rng);
    deal_harbors(topology, &mut tiles, rng);

    trace!(variant = %topology.variant(), "dealt candidate board");
    Board::from_tiles(Arc::clone(topology), tiles)
}

/// Draw an index not yet marked in `dealt`, and mark it.
///
/// Returns `None` once every index has been dealt.
pub fn draw_unallocated<R: Rng + ?Sized>(rng: &mut R, dealt: &mut [bool]) -> Option<usize> {
    if dealt.iter().all(|d| *d) {
        return None;
    }
    loop {
        let index = rng.gen_range(0..dealt.len());
        if !dealt[index] {
            dealt[index] = true;
            return Some(index);
        }
    }
}

fn deal_landscapes<R: Rng + ?Sized>(topology: &Topology, rng: &mut R) -> Vec<Tile> {
    let pile: Vec<Landscape> = topology
        .landscape_counts()
        .flat_map(|(landscape, count)| std::iter::repeat(landscape).take(count))
        .collect();
    let mut dealt = vec![false; pile.len()];

    let mut tiles = Vec::with_capacity(topology.total_cells());
    for &cells in topology.cell_layout() {
        for _ in 0..cells {
            if let Some(index) = draw_unallocated(rng, &mut dealt) {
                tiles.push(Tile::new(pile[index]));
            }
        }
    }
    tiles
}

fn deal_numbers<R: Rng + ?Sized>(topology: &Topology, tiles: &mut [Tile], rng: &mut R) {
    let pool = topology.number_pool();
    let mut dealt = vec![false; pool.len()];

    for tile in tiles.iter_mut().filter(|t| !t.is_desert()) {
        tile.number = draw_unallocated(rng, &mut dealt).map(|index| pool[index]);
    }
}

fn deal_harbors<R: Rng + ?Sized>(topology: &Topology, tiles: &mut [Tile], rng: &mut R) {
    let pool = topology.harbor_pool();
    let mut dealt = vec![false; pool.len()];

    for site in topology.harbor_sites() {
        let Some(index) = draw_unallocated(rng, &mut dealt) else {
            break;
        };
        if let Some(tile) = tiles.get_mut(site.anchor) {
            tile.harbor = Some(pool[index]);
        }
    }
}
