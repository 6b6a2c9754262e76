//! Plain-text rendering of boards for terminals.

use crate::board::Board;
use crate::tile::{Landscape, Tile};
use crate::topology::{Topology, Variant};
use std::fmt::Write;

/// A way of drawing a board as text
pub trait RenderStrategy {
    fn render(&self, board: &Board) -> String;
}

/// Staggered rows that keep the hexagonal shape
#[derive(Debug, Clone, Copy, Default)]
pub struct HexRenderer;

/// One line per row, every tile spelled out
#[derive(Debug, Clone, Copy, Default)]
pub struct RowRenderer;

/// Pick the renderer that reads best for a board shape
pub fn for_topology(topology: &Topology) -> Box<dyn RenderStrategy> {
    match topology.variant() {
        Variant::Normal => Box::new(HexRenderer),
        Variant::Large => Box::new(RowRenderer),
    }
}

const CELL_WIDTH: usize = 8;

impl RenderStrategy for HexRenderer {
    fn render(&self, board: &Board) -> String {
        let widest = board.topology().cell_layout().iter().copied().max().unwrap_or(0);
        let mut out = String::new();

        for row in board.rows() {
            let indent = (widest - row.len()) * CELL_WIDTH / 2;
            let cells: Vec<String> = row.iter().map(short_label).collect();
            let _ = writeln!(out, "{:indent$}{}", "", cells.join(" "));
        }
        write_harbors(&mut out, board);
        out
    }
}

impl RenderStrategy for RowRenderer {
    fn render(&self, board: &Board) -> String {
        let mut out = String::new();

        for (index, row) in board.rows().enumerate() {
            let cells: Vec<String> = row.iter().map(long_label).collect();
            let _ = writeln!(out, "row {index}: {}", cells.join(", "));
        }
        write_harbors(&mut out, board);
        out
    }
}

fn abbreviation(landscape: Landscape) -> &'static str {
    match landscape {
        Landscape::Desert => "De",
        Landscape::Forest => "Fo",
        Landscape::Pasture => "Pa",
        Landscape::Field => "Fi",
        Landscape::Hill => "Hi",
        Landscape::Mountain => "Mo",
    }
}

fn number_label(tile: &Tile) -> String {
    tile.number.map_or_else(|| "--".to_string(), |n| n.value().to_string())
}

fn short_label(tile: &Tile) -> String {
    format!("[{} {:>2}]", abbreviation(tile.landscape), number_label(tile))
}

fn long_label(tile: &Tile) -> String {
    format!("{} {}", tile.landscape.name(), number_label(tile))
}

fn write_harbors(out: &mut String, board: &Board) {
    for placement in board.harbors() {
        let cells: Vec<String> = placement
            .site
            .cells()
            .filter_map(|cell| board.topology().cell_ref(cell))
            .map(|c| format!("({},{})", c.row, c.column))
            .collect();
        let _ = writeln!(out, "harbor {} at {}", placement.harbor.name(), cells.join("+"));
    }
}
