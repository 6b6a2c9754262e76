//! Hex coordinate system using axial coordinates (q, r).
//!
//! Boards are described as rows of cells (`[3, 4, 5, 4, 3]`), which is
//! convenient for codes and printing but awkward for adjacency. This module
//! maps rows onto axial coordinates so that neighbors and the corners where
//! three tiles meet fall out of the geometry instead of hand-kept tables.

use serde::{Deserialize, Serialize};

/// Which pole of its owning hex a vertex is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexDirection {
    North,
    South,
}

/// The six sides of a pointy-top hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    NorthEast,
    East,
    SouthEast,
    SouthWest,
    West,
    NorthWest,
}

/// Axial hex coordinate.
///
/// `q` grows eastward along a board row and `r` counts board rows from the
/// top, so a row of the layout is a run of consecutive `q` at fixed `r`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Third cube coordinate, `q + r + s == 0`
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    pub fn neighbor(&self, direction: EdgeDirection) -> HexCoord {
        let (dq, dr) = match direction {
            EdgeDirection::NorthEast => (1, -1),
            EdgeDirection::East => (1, 0),
            EdgeDirection::SouthEast => (0, 1),
            EdgeDirection::SouthWest => (-1, 1),
            EdgeDirection::West => (-1, 0),
            EdgeDirection::NorthWest => (0, -1),
        };
        HexCoord::new(self.q + dq, self.r + dr)
    }

    /// Steps between two hexes
    pub fn distance_to(&self, other: &HexCoord) -> u32 {
        let dq = self.q.abs_diff(other.q);
        let dr = self.r.abs_diff(other.r);
        let ds = self.s().abs_diff(other.s());
        dq.max(dr).max(ds)
    }

    pub fn is_adjacent(&self, other: &HexCoord) -> bool {
        self.distance_to(other) == 1
    }

    /// The two vertices this hex owns. Every vertex of the grid is the
    /// North or South pole of exactly one hex.
    pub fn poles(&self) -> [VertexCoord; 2] {
        [VertexDirection::North, VertexDirection::South].map(|direction| VertexCoord::new(*self, direction))
    }
}

/// A corner where three hexes meet, named by the hex whose pole it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexCoord {
    pub hex: HexCoord,
    pub direction: VertexDirection,
}

impl VertexCoord {
    pub const fn new(hex: HexCoord, direction: VertexDirection) -> Self {
        Self { hex, direction }
    }

    /// The owning hex followed by the two hexes sharing the corner with it
    pub fn touching_hexes(&self) -> [HexCoord; 3] {
        let (west, east) = match self.direction {
            VertexDirection::North => (EdgeDirection::NorthWest, EdgeDirection::NorthEast),
            VertexDirection::South => (EdgeDirection::SouthWest, EdgeDirection::SouthEast),
        };
        [self.hex, self.hex.neighbor(west), self.hex.neighbor(east)]
    }
}

/// Lay rows of the given lengths onto the axial grid, row-major.
///
/// Row `i` sits at `r = i`. A row longer than the one above starts half a
/// hex further west (its first hex is the SouthWest neighbor of the previous
/// first hex); a row that is not longer starts at the SouthEast neighbor.
pub fn axial_rows(cell_counts: &[usize]) -> Vec<HexCoord> {
    let mut coords = Vec::with_capacity(cell_counts.iter().sum());
    let mut row_start = HexCoord::new(0, 0);

    for (row, &count) in cell_counts.iter().enumerate() {
        if row > 0 {
            let direction = if count > cell_counts[row - 1] {
                EdgeDirection::SouthWest
            } else {
                EdgeDirection::SouthEast
            };
            row_start = row_start.neighbor(direction);
        }
        coords.extend((0..count as i32).map(|i| HexCoord::new(row_start.q + i, row_start.r)));
    }

    coords
}
