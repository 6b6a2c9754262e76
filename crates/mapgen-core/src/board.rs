//! A filled board: one tile per cell of a topology.
//!
//! Boards are produced by the generator or by decoding a board code, and are
//! never mutated afterwards. This lets the board codes be computed on first
//! use and cached.

use crate::codec;
use crate::tile::{Harbor, Landscape, Resource, Tile};
use crate::topology::{HarborSite, Topology, Variant};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

/// A harbor together with the site it occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarborPlacement {
    pub harbor: Harbor,
    pub site: HarborSite,
}

/// The complete board for one generation or decode call
#[derive(Debug, Clone)]
pub struct Board {
    /// Shape the tiles are laid out on
    topology: Arc<Topology>,
    /// Tiles in row-major cell order
    tiles: Vec<Tile>,
    code: OnceLock<String>,
    delimited_code: OnceLock<String>,
}

impl Board {
    /// Wrap tiles laid out in row-major order over `topology`.
    ///
    /// The tile count is not checked here; the validator reports a mismatch.
    pub fn from_tiles(topology: Arc<Topology>, tiles: Vec<Tile>) -> Self {
        Self {
            topology,
            tiles,
            code: OnceLock::new(),
            delimited_code: OnceLock::new(),
        }
    }

    pub fn topology(&self) -> &Arc<Topology> {
        &self.topology
    }

    pub fn variant(&self) -> Variant {
        self.topology.variant()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn tile_at(&self, row: usize, column: usize) -> Option<&Tile> {
        self.tile(self.topology.cell_index(row, column)?)
    }

    /// Tiles grouped by row, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        (0..self.topology.row_count()).map(|row| {
            let range = self.topology.row_range(row).unwrap_or(0..0);
            self.tiles.get(range).unwrap_or(&[])
        })
    }

    /// Harbors on the board, in harbor-site order
    pub fn harbors(&self) -> Vec<HarborPlacement> {
        self.topology
            .harbor_sites()
            .iter()
            .filter_map(|site| {
                let harbor = self.tile(site.anchor)?.harbor?;
                Some(HarborPlacement { harbor, site: *site })
            })
            .collect()
    }

    /// Number of tiles of a landscape
    pub fn count_landscape(&self, landscape: Landscape) -> usize {
        self.tiles.iter().filter(|t| t.landscape == landscape).count()
    }

    /// Tiles producing a resource
    pub fn tiles_producing(&self, resource: Resource) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles
            .iter()
            .filter(move |t| t.resource() == Some(resource))
    }

    /// The shareable board code, with or without row delimiters
    pub fn game_code(&self, delimited: bool) -> &str {
        let cell = if delimited {
            &self.delimited_code
        } else {
            &self.code
        };
        cell.get_or_init(|| codec::encode(self, delimited))
    }

    /// Convert to a JSON-friendly format for clients
    pub fn to_json_friendly(&self) -> BoardJson {
        let rows = self
            .rows()
            .enumerate()
            .map(|(row, tiles)| {
                let start = self.topology.cell_index(row, 0).unwrap_or_default();
                tiles
                    .iter()
                    .enumerate()
                    .map(|(column, tile)| {
                        let coord = self.topology.coord(start + column).unwrap_or_default();
                        TileJson {
                            row,
                            column,
                            q: coord.q,
                            r: coord.r,
                            landscape: tile.landscape,
                            resource: tile.resource(),
                            number: tile.number.map(|n| n.value()),
                            score: tile.weight(),
                            harbor: tile.harbor.map(|h| h.name()),
                        }
                    })
                    .collect()
            })
            .collect();

        let harbors = self
            .harbors()
            .into_iter()
            .map(|placement| HarborJson {
                name: placement.harbor.name(),
                harbor: placement.harbor,
                cells: placement.site.cells().collect(),
            })
            .collect();

        BoardJson {
            game_type: self.variant(),
            rows,
            harbors,
        }
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.variant() == other.variant() && self.tiles == other.tiles
    }
}

impl Eq for Board {}

/// JSON-friendly board representation with rows of tiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardJson {
    pub game_type: Variant,
    pub rows: Vec<Vec<TileJson>>,
    pub harbors: Vec<HarborJson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileJson {
    pub row: usize,
    pub column: usize,
    pub q: i32,
    pub r: i32,
    pub landscape: Landscape,
    pub resource: Option<Resource>,
    pub number: Option<u8>,
    /// Probability score of the number token
    pub score: u32,
    pub harbor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarborJson {
    pub harbor: Harbor,
    pub name: String,
    /// Flat indices of the cells the harbor touches, anchor first
    pub cells: Vec<usize>,
}
