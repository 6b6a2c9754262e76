//! Fairness checks for candidate boards.
//!
//! Each [`Check`] is independent and only reads the board, so
//! [`validate`] runs all of them at once inside a `rayon::scope` and joins
//! on the results. Every check always runs to completion; the verdict is the
//! AND of all outcomes.
//!
//! Checks:
//! - `TileCount`: one tile per cell
//! - `AdjacentTriples`: score of every intersection within bounds, few "hot" ones
//! - `ResourceScores`: average score per resource within bounds
//! - `Harbors`: no 2:1 harbor touching a tile of its own resource
//! - `ResourceSpread`: no clumps of one landscape along rows or column arcs

use crate::board::{Board, HarborPlacement};
use crate::rules::GameRules;
use crate::tile::{Landscape, Resource, Tile, HIGH_SCORE_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// One independent validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Check {
    TileCount,
    AdjacentTriples,
    ResourceScores,
    Harbors,
    ResourceSpread,
}

impl Check {
    pub const ALL: [Check; 5] = [
        Check::TileCount,
        Check::AdjacentTriples,
        Check::ResourceScores,
        Check::Harbors,
        Check::ResourceSpread,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Check::TileCount => "tile count",
            Check::AdjacentTriples => "adjacent triples",
            Check::ResourceScores => "resource scores",
            Check::Harbors => "harbors",
            Check::ResourceSpread => "resource spread",
        }
    }

    /// Run this check alone
    pub fn run(&self, board: &Board, rules: &GameRules) -> CheckOutcome {
        let (passed, detail) = match self {
            Check::TileCount => check_tile_count(board),
            Check::AdjacentTriples => check_adjacent_triples(board, rules),
            Check::ResourceScores => check_resource_scores(board, rules),
            Check::Harbors => check_harbors(board, rules),
            Check::ResourceSpread => check_resource_spread(board, rules),
        };
        debug!(check = self.name(), passed, %detail, "validation check finished");
        CheckOutcome {
            check: *self,
            passed,
            detail,
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a single check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub check: Check,
    pub passed: bool,
    /// Human-readable reason, also present when the check passed
    pub detail: String,
}

/// Outcomes of every check run against one board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    outcomes: Vec<CheckOutcome>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    /// Outcomes in [`Check::ALL`] order
    pub fn outcomes(&self) -> &[CheckOutcome] {
        &self.outcomes
    }

    pub fn outcome(&self, check: Check) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|o| o.check == check)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> + '_ {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}

/// Run every check concurrently and collect the outcomes
pub fn validate(board: &Board, rules: &GameRules) -> ValidationReport {
    let mut slots: [Option<CheckOutcome>; 5] = Default::default();

    rayon::scope(|scope| {
        for (check, slot) in Check::ALL.into_iter().zip(slots.iter_mut()) {
            scope.spawn(move |_| *slot = Some(check.run(board, rules)));
        }
    });

    ValidationReport {
        outcomes: slots.into_iter().flatten().collect(),
    }
}

/// Whether the board passes every check
pub fn is_valid(board: &Board, rules: &GameRules) -> bool {
    validate(board, rules).is_valid()
}

/// Score of every adjacent triple, in topology order
pub fn triple_scores(board: &Board) -> Vec<u32> {
    board
        .topology()
        .adjacent_triple_groups()
        .iter()
        .map(|group| group.iter().map(|&i| board.tile(i).map_or(0, Tile::weight)).sum())
        .collect()
}

/// Integer average score of each resource; `None` when no tile produces it
pub fn average_resource_scores(board: &Board) -> Vec<(Resource, Option<u32>)> {
    Resource::ALL
        .into_iter()
        .map(|resource| {
            let (count, total) = board
                .tiles_producing(resource)
                .fold((0u32, 0u32), |(count, total), t| (count + 1, total + t.weight()));
            (resource, total.checked_div(count))
        })
        .collect()
}

/// Harbors whose 2:1 resource is produced by a tile of their site
pub fn harbor_conflicts(board: &Board) -> Vec<HarborPlacement> {
    board
        .harbors()
        .into_iter()
        .filter(|placement| {
            let Some(resource) = placement.harbor.resource() else {
                return false;
            };
            placement
                .site
                .cells()
                .any(|cell| board.tile(cell).and_then(Tile::resource) == Some(resource))
        })
        .collect()
}

/// No producing landscape appears more than `max` times in any row
pub fn rows_within_limit(board: &Board, max: u32) -> bool {
    board.rows().all(|row| most_common_landscape(row.iter()) <= max)
}

/// No producing landscape appears more than `max` times along a column arc.
///
/// Arcs are the diagonals running through column `i` of consecutive rows:
/// the left arcs start at the top row, the right arcs at the middle row,
/// and each spans half the rows plus one.
pub fn column_arcs_within_limit(board: &Board, max: u32) -> bool {
    let rows = board.topology().row_count();
    let half = rows / 2;
    let columns = board.topology().cell_layout().first().copied().unwrap_or(0);

    [0, half].into_iter().all(|first_row| {
        (0..columns).all(|column| {
            let arc = (first_row..=first_row + half).filter_map(|row| board.tile_at(row, column));
            most_common_landscape(arc) <= max
        })
    })
}

fn most_common_landscape<'a>(tiles: impl Iterator<Item = &'a Tile>) -> u32 {
    let mut counts = [0u32; Landscape::ALL.len()];
    for tile in tiles.filter(|t| !t.is_desert()) {
        counts[tile.landscape.index()] += 1;
    }
    counts.into_iter().max().unwrap_or(0)
}

fn check_tile_count(board: &Board) -> (bool, String) {
    let expected = board.topology().total_cells();
    let actual = board.tiles().len();
    (actual == expected, format!("{actual} tiles, expected {expected}"))
}

fn check_adjacent_triples(board: &Board, rules: &GameRules) -> (bool, String) {
    let scores = triple_scores(board);
    let range = rules.min_triple_score..=rules.max_triple_score;

    if let Some((index, score)) = scores.iter().enumerate().find(|(_, s)| !range.contains(*s)) {
        let group = board.topology().adjacent_triple_groups()[index];
        return (
            false,
            format!("triple {group:?} scores {score}, allowed {}..={}", range.start(), range.end()),
        );
    }

    let hot = scores.iter().filter(|s| **s > HIGH_SCORE_THRESHOLD).count() as u32;
    if hot > rules.max_triples_over_threshold {
        return (
            false,
            format!(
                "{hot} triples over {HIGH_SCORE_THRESHOLD}, allowed {}",
                rules.max_triples_over_threshold
            ),
        );
    }

    (true, format!("{} triples in range, {hot} over {HIGH_SCORE_THRESHOLD}", scores.len()))
}

fn check_resource_scores(board: &Board, rules: &GameRules) -> (bool, String) {
    let range = rules.min_avg_resource_score..=rules.max_avg_resource_score;
    let mut problems = Vec::new();

    for (resource, average) in average_resource_scores(board) {
        match average {
            None => problems.push(format!("no {} tiles", resource.name())),
            Some(avg) if !range.contains(&avg) => {
                problems.push(format!("{} averages {avg}", resource.name()))
            }
            Some(_) => {}
        }
    }

    if problems.is_empty() {
        (true, "all resource averages in range".to_string())
    } else {
        (false, problems.join(", "))
    }
}

fn check_harbors(board: &Board, rules: &GameRules) -> (bool, String) {
    if !rules.validate_harbors {
        return (true, "skipped".to_string());
    }

    let conflicts = harbor_conflicts(board);
    match conflicts.first() {
        None => (true, "no harbor touches its own resource".to_string()),
        Some(placement) => (
            false,
            format!(
                "{} harbor at cell {} touches its own resource ({} conflicts)",
                placement.harbor.name(),
                placement.site.anchor,
                conflicts.len()
            ),
        ),
    }
}

fn check_resource_spread(board: &Board, rules: &GameRules) -> (bool, String) {
    if !rows_within_limit(board, rules.max_same_landscape_per_row) {
        return (
            false,
            format!(
                "more than {} of one landscape in a row",
                rules.max_same_landscape_per_row
            ),
        );
    }
    if !column_arcs_within_limit(board, rules.max_same_landscape_per_column_arc) {
        return (
            false,
            format!(
                "more than {} of one landscape in a column arc",
                rules.max_same_landscape_per_column_arc
            ),
        );
    }
    (true, "landscapes spread out".to_string())
}
