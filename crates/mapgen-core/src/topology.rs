//! Board topologies for the supported game variants.
//!
//! A [`Topology`] is the immutable description of one board shape:
//! - the row layout of land cells
//! - how many tiles of each landscape go on it
//! - the pools of number tokens and harbors to distribute
//! - the harbor sites along the coast
//! - every group of three cells meeting at one intersection
//!
//! Topologies are built once by factory functions and shared as
//! `Arc<Topology>`; nothing here is global.

use crate::hex::{axial_rows, HexCoord};
use crate::tile::{Harbor, Landscape, NumberToken, Resource};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;

/// Supported game variants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// 3-4 players, 19 land tiles
    #[default]
    Normal,
    /// 5-6 players extension, 30 land tiles
    Large,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Normal, Variant::Large];

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Normal => "Normal",
            Variant::Large => "Large",
        }
    }

    /// Pick the variant a board code belongs to from its length alone.
    ///
    /// Plain codes are three characters per cell; delimited codes add one
    /// character per row.
    pub fn from_code_length(len: usize) -> Option<Variant> {
        match len {
            57 | 62 => Some(Variant::Normal),
            90 | 97 => Some(Variant::Large),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Variant::Normal),
            "large" => Ok(Variant::Large),
            other => Err(format!("unknown game type: {other}")),
        }
    }
}

/// A cell addressed by row and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub column: usize,
}

/// A coastal spot where a harbor can be placed.
///
/// The anchor cell carries the harbor on the board; a pair site also
/// touches the partner cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HarborSite {
    pub anchor: usize,
    pub partner: Option<usize>,
}

impl HarborSite {
    /// Flat indices of every cell this site touches, anchor first
    pub fn cells(&self) -> impl Iterator<Item = usize> {
        std::iter::once(self.anchor).chain(self.partner)
    }
}

type SiteSpec = ((usize, usize), Option<(usize, usize)>);

const NORMAL_LAYOUT: [usize; 5] = [3, 4, 5, 4, 3];
const LARGE_LAYOUT: [usize; 7] = [3, 4, 5, 6, 5, 4, 3];

// desert, forest, pasture, field, hill, mountain
const NORMAL_LANDSCAPES: [usize; 6] = [1, 4, 4, 4, 3, 3];
const LARGE_LANDSCAPES: [usize; 6] = [2, 6, 6, 6, 5, 5];

const NORMAL_SITES: [SiteSpec; 9] = [
    ((2, 0), None),
    ((0, 0), Some((1, 0))),
    ((4, 0), Some((3, 0))),
    ((0, 1), Some((0, 0))),
    ((4, 1), Some((4, 0))),
    ((0, 2), None),
    ((4, 2), None),
    ((1, 3), Some((2, 4))),
    ((3, 3), Some((2, 4))),
];

const LARGE_SITES: [SiteSpec; 11] = [
    ((3, 0), None),
    ((0, 0), None),
    ((0, 1), None),
    ((0, 2), None),
    ((2, 4), None),
    ((4, 4), None),
    ((5, 3), None),
    ((6, 2), None),
    ((6, 1), None),
    ((6, 0), None),
    ((4, 0), None),
];

/// Immutable description of one board shape and its tile pools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    variant: Variant,
    cell_layout: Vec<usize>,
    row_offsets: Vec<usize>,
    landscape_counts: [usize; 6],
    number_pool: Vec<NumberToken>,
    harbor_pool: Vec<Harbor>,
    harbor_sites: Vec<HarborSite>,
    coords: Vec<HexCoord>,
    triples: Vec<[usize; 3]>,
}

impl Topology {
    /// The standard 19-tile board
    pub fn normal() -> Self {
        let number_pool = number_pool(|value| if value == 2 || value == 12 { 1 } else { 2 });
        let mut harbor_pool: Vec<Harbor> = Resource::ALL.into_iter().map(Harbor::Specific).collect();
        harbor_pool.extend([Harbor::Generic; 4]);

        Self::build(
            Variant::Normal,
            &NORMAL_LAYOUT,
            NORMAL_LANDSCAPES,
            number_pool,
            harbor_pool,
            &NORMAL_SITES,
        )
    }

    /// The 30-tile board of the 5-6 player extension
    pub fn large() -> Self {
        let number_pool = number_pool(|value| if value == 2 || value == 12 { 2 } else { 3 });
        let mut harbor_pool: Vec<Harbor> = Resource::ALL.into_iter().map(Harbor::Specific).collect();
        harbor_pool.push(Harbor::Specific(Resource::Wool));
        harbor_pool.extend([Harbor::Generic; 5]);

        Self::build(
            Variant::Large,
            &LARGE_LAYOUT,
            LARGE_LANDSCAPES,
            number_pool,
            harbor_pool,
            &LARGE_SITES,
        )
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Normal => Self::normal(),
            Variant::Large => Self::large(),
        }
    }

    fn build(
        variant: Variant,
        layout: &[usize],
        landscape_counts: [usize; 6],
        number_pool: Vec<NumberToken>,
        harbor_pool: Vec<Harbor>,
        sites: &[SiteSpec],
    ) -> Self {
        let row_offsets: Vec<usize> = layout
            .iter()
            .scan(0, |acc, count| {
                let start = *acc;
                *acc += count;
                Some(start)
            })
            .collect();

        let flat = |(row, column): (usize, usize)| row_offsets[row] + column;
        let harbor_sites = sites
            .iter()
            .map(|(anchor, partner)| HarborSite {
                anchor: flat(*anchor),
                partner: partner.map(flat),
            })
            .collect();

        let coords = axial_rows(layout);
        let triples = derive_triples(&coords);

        Self {
            variant,
            cell_layout: layout.to_vec(),
            row_offsets,
            landscape_counts,
            number_pool,
            harbor_pool,
            harbor_sites,
            coords,
            triples,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn name(&self) -> &'static str {
        self.variant.name()
    }

    /// Number of cells in each row, top to bottom
    pub fn cell_layout(&self) -> &[usize] {
        &self.cell_layout
    }

    pub fn row_count(&self) -> usize {
        self.cell_layout.len()
    }

    pub fn total_cells(&self) -> usize {
        self.coords.len()
    }

    /// Flat indices covered by a row
    pub fn row_range(&self, row: usize) -> Option<Range<usize>> {
        let start = *self.row_offsets.get(row)?;
        Some(start..start + self.cell_layout[row])
    }

    pub fn cell_index(&self, row: usize, column: usize) -> Option<usize> {
        let range = self.row_range(row)?;
        (column < range.len()).then_some(range.start + column)
    }

    pub fn cell_ref(&self, index: usize) -> Option<CellRef> {
        if index >= self.total_cells() {
            return None;
        }
        let row = self.row_offsets.partition_point(|start| *start <= index) - 1;
        Some(CellRef {
            row,
            column: index - self.row_offsets[row],
        })
    }

    /// Axial position of a cell
    pub fn coord(&self, index: usize) -> Option<HexCoord> {
        self.coords.get(index).copied()
    }

    /// How many tiles of each landscape the board holds
    pub fn landscape_counts(&self) -> impl Iterator<Item = (Landscape, usize)> + '_ {
        Landscape::ALL
            .into_iter()
            .map(|landscape| (landscape, self.landscape_counts[landscape.index()]))
    }

    pub fn landscape_count(&self, landscape: Landscape) -> usize {
        self.landscape_counts[landscape.index()]
    }

    pub fn number_pool(&self) -> &[NumberToken] {
        &self.number_pool
    }

    pub fn harbor_pool(&self) -> &[Harbor] {
        &self.harbor_pool
    }

    pub fn harbor_sites(&self) -> &[HarborSite] {
        &self.harbor_sites
    }

    /// The site whose anchor is the given cell
    pub fn site_for_anchor(&self, index: usize) -> Option<&HarborSite> {
        self.harbor_sites.iter().find(|site| site.anchor == index)
    }

    /// Every group of three cells sharing an intersection, as sorted flat
    /// indices
    pub fn adjacent_triple_groups(&self) -> &[[usize; 3]] {
        &self.triples
    }
}

fn number_pool(copies: impl Fn(u8) -> usize) -> Vec<NumberToken> {
    NumberToken::VALUES
        .into_iter()
        .filter_map(NumberToken::new)
        .flat_map(|token| std::iter::repeat(token).take(copies(token.value())))
        .collect()
}

/// Collect every intersection whose three touching hexes are all on the board.
fn derive_triples(coords: &[HexCoord]) -> Vec<[usize; 3]> {
    let index_of: HashMap<HexCoord, usize> = coords
        .iter()
        .enumerate()
        .map(|(index, coord)| (*coord, index))
        .collect();

    let mut triples = BTreeSet::new();
    for coord in coords {
        for vertex in coord.poles() {
            let hexes = vertex.touching_hexes();
            let indices: Option<Vec<usize>> = hexes.iter().map(|h| index_of.get(h).copied()).collect();
            if let Some(mut indices) = indices {
                indices.sort_unstable();
                triples.insert([indices[0], indices[1], indices[2]]);
            }
        }
    }

    triples.into_iter().collect()
}

/// One shared topology per variant, for long-running services
#[derive(Debug, Clone)]
pub struct TopologyCatalog {
    normal: Arc<Topology>,
    large: Arc<Topology>,
}

impl TopologyCatalog {
    pub fn new() -> Self {
        Self {
            normal: Arc::new(Topology::normal()),
            large: Arc::new(Topology::large()),
        }
    }

    pub fn get(&self, variant: Variant) -> &Arc<Topology> {
        match variant {
            Variant::Normal => &self.normal,
            Variant::Large => &self.large,
        }
    }
}

impl Default for TopologyCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn both() -> [Topology; 2] {
        [Topology::normal(), Topology::large()]
    }

    #[test]
    fn test_cell_counts() {
        let normal = Topology::normal();
        assert_eq!(normal.total_cells(), 19);
        assert_eq!(normal.row_count(), 5);

        let large = Topology::large();
        assert_eq!(large.total_cells(), 30);
        assert_eq!(large.row_count(), 7);
    }

    #[test]
    fn test_pools_fit_the_board() {
        for topology in both() {
            let landscapes: usize = topology.landscape_counts().map(|(_, n)| n).sum();
            assert_eq!(landscapes, topology.total_cells());

            let deserts = topology.landscape_count(Landscape::Desert);
            assert_eq!(topology.number_pool().len(), topology.total_cells() - deserts);

            assert_eq!(topology.harbor_pool().len(), topology.harbor_sites().len());
        }
    }

    #[test]
    fn test_number_pool_contents() {
        let normal = Topology::normal();
        assert_eq!(normal.number_pool().len(), 18);
        let twos = normal.number_pool().iter().filter(|n| n.value() == 2).count();
        let sixes = normal.number_pool().iter().filter(|n| n.value() == 6).count();
        assert_eq!((twos, sixes), (1, 2));

        let large = Topology::large();
        assert_eq!(large.number_pool().len(), 28);
        let twelves = large.number_pool().iter().filter(|n| n.value() == 12).count();
        let eights = large.number_pool().iter().filter(|n| n.value() == 8).count();
        assert_eq!((twelves, eights), (2, 3));
    }

    #[test]
    fn test_harbor_pool_contents() {
        let normal = Topology::normal();
        let generic = normal.harbor_pool().iter().filter(|h| **h == Harbor::Generic).count();
        assert_eq!(generic, 4);

        let large = Topology::large();
        let generic = large.harbor_pool().iter().filter(|h| **h == Harbor::Generic).count();
        let wool = large
            .harbor_pool()
            .iter()
            .filter(|h| **h == Harbor::Specific(Resource::Wool))
            .count();
        assert_eq!((generic, wool), (5, 2));
    }

    #[test]
    fn test_triple_counts() {
        assert_eq!(Topology::normal().adjacent_triple_groups().len(), 24);
        assert_eq!(Topology::large().adjacent_triple_groups().len(), 42);
    }

    #[test]
    fn test_triples_are_mutually_adjacent() {
        for topology in both() {
            for [a, b, c] in topology.adjacent_triple_groups() {
                let (a, b, c) = (
                    topology.coord(*a).unwrap(),
                    topology.coord(*b).unwrap(),
                    topology.coord(*c).unwrap(),
                );
                assert!(a.is_adjacent(&b) && b.is_adjacent(&c) && a.is_adjacent(&c));
            }
        }
    }

    #[test]
    fn test_first_normal_triples() {
        let normal = Topology::normal();
        let groups = normal.adjacent_triple_groups();
        // top-left corner: cells 0 and 1 of row 0 with cell 1 of row 1
        assert!(groups.contains(&[0, 1, 4]));
        // cell 0 of row 0 with cells 0 and 1 of row 1
        assert!(groups.contains(&[0, 3, 4]));
    }

    #[test]
    fn test_harbor_site_pairs_are_adjacent() {
        for topology in both() {
            for site in topology.harbor_sites() {
                assert!(site.anchor < topology.total_cells());
                if let Some(partner) = site.partner {
                    let anchor = topology.coord(site.anchor).unwrap();
                    let partner = topology.coord(partner).unwrap();
                    assert!(anchor.is_adjacent(&partner));
                }
            }
        }
    }

    #[test]
    fn test_harbor_anchors_are_unique() {
        for topology in both() {
            let anchors: BTreeSet<_> = topology.harbor_sites().iter().map(|s| s.anchor).collect();
            assert_eq!(anchors.len(), topology.harbor_sites().len());
        }
    }

    #[test]
    fn test_cell_addressing() {
        let normal = Topology::normal();
        assert_eq!(normal.cell_index(2, 4), Some(11));
        assert_eq!(normal.cell_index(2, 5), None);
        assert_eq!(normal.cell_index(5, 0), None);
        assert_eq!(normal.cell_ref(11), Some(CellRef { row: 2, column: 4 }));
        assert_eq!(normal.cell_ref(0), Some(CellRef { row: 0, column: 0 }));
        assert_eq!(normal.cell_ref(18), Some(CellRef { row: 4, column: 2 }));
        assert_eq!(normal.cell_ref(19), None);
        assert_eq!(normal.row_range(1), Some(3..7));
    }

    #[test]
    fn test_variant_from_code_length() {
        assert_eq!(Variant::from_code_length(57), Some(Variant::Normal));
        assert_eq!(Variant::from_code_length(62), Some(Variant::Normal));
        assert_eq!(Variant::from_code_length(90), Some(Variant::Large));
        assert_eq!(Variant::from_code_length(97), Some(Variant::Large));
        assert_eq!(Variant::from_code_length(58), None);
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("Normal".parse::<Variant>(), Ok(Variant::Normal));
        assert_eq!("large".parse::<Variant>(), Ok(Variant::Large));
        assert!("huge".parse::<Variant>().is_err());
        assert_eq!(serde_json::to_string(&Variant::Large).unwrap(), "\"large\"");
    }

    #[test]
    fn test_catalog_shares_topologies() {
        let catalog = TopologyCatalog::new();
        let a = Arc::clone(catalog.get(Variant::Normal));
        let b = Arc::clone(catalog.get(Variant::Normal));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(catalog.get(Variant::Large).variant(), Variant::Large);
    }
}
