//! Fairness constraints a generated board must satisfy.

use crate::topology::Variant;
use serde::{Deserialize, Serialize};

/// Limits applied by the validator and the retry loop.
///
/// Scores are sums of number-token weights (see
/// [`crate::tile::NumberToken::weight`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    /// Lowest allowed score of three tiles meeting at an intersection
    pub min_triple_score: u32,
    /// Highest allowed score of three tiles meeting at an intersection
    pub max_triple_score: u32,
    /// How many intersections may score above 300
    pub max_triples_over_threshold: u32,
    /// Lowest allowed average weight of the tiles producing one resource
    pub min_avg_resource_score: u32,
    /// Highest allowed average weight of the tiles producing one resource
    pub max_avg_resource_score: u32,
    pub max_same_landscape_per_row: u32,
    pub max_same_landscape_per_column_arc: u32,
    /// Candidate boards to try before giving up
    pub max_attempts: u32,
    /// Reject boards with a 2:1 harbor next to a tile of its own resource
    #[serde(default = "default_validate_harbors")]
    pub validate_harbors: bool,
}

fn default_validate_harbors() -> bool {
    true
}

impl GameRules {
    pub const NORMAL: GameRules = GameRules {
        min_triple_score: 165,
        max_triple_score: 361,
        max_triples_over_threshold: 10,
        min_avg_resource_score: 30,
        max_avg_resource_score: 130,
        max_same_landscape_per_row: 2,
        max_same_landscape_per_column_arc: 2,
        max_attempts: 1500,
        validate_harbors: true,
    };

    pub const LARGE: GameRules = GameRules {
        min_triple_score: 156,
        max_triple_score: 365,
        max_triples_over_threshold: 22,
        min_avg_resource_score: 65,
        max_avg_resource_score: 130,
        max_same_landscape_per_row: 3,
        max_same_landscape_per_column_arc: 3,
        max_attempts: 5000,
        validate_harbors: true,
    };

    /// Default rules for a variant
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Normal => Self::NORMAL,
            Variant::Large => Self::LARGE,
        }
    }

    /// Replace every field the overrides set, keep the rest
    pub fn with_overrides(mut self, overrides: &RulesOverrides) -> Self {
        let RulesOverrides {
            min,
            max,
            max300,
            minr,
            maxr,
            max_row,
            max_column,
            attempts,
            validate_harbors,
        } = *overrides;

        self.min_triple_score = min.unwrap_or(self.min_triple_score);
        self.max_triple_score = max.unwrap_or(self.max_triple_score);
        self.max_triples_over_threshold = max300.unwrap_or(self.max_triples_over_threshold);
        self.min_avg_resource_score = minr.unwrap_or(self.min_avg_resource_score);
        self.max_avg_resource_score = maxr.unwrap_or(self.max_avg_resource_score);
        self.max_same_landscape_per_row = max_row.unwrap_or(self.max_same_landscape_per_row);
        self.max_same_landscape_per_column_arc =
            max_column.unwrap_or(self.max_same_landscape_per_column_arc);
        self.max_attempts = attempts.unwrap_or(self.max_attempts);
        self.validate_harbors = validate_harbors.unwrap_or(self.validate_harbors);
        self
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Optional per-request rule changes, named the way clients send them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RulesOverrides {
    pub min: Option<u32>,
    pub max: Option<u32>,
    pub max300: Option<u32>,
    pub minr: Option<u32>,
    pub maxr: Option<u32>,
    pub max_row: Option<u32>,
    pub max_column: Option<u32>,
    pub attempts: Option<u32>,
    pub validate_harbors: Option<bool>,
}

impl RulesOverrides {
    /// The variant's default rules with these overrides applied
    pub fn resolve(&self, variant: Variant) -> GameRules {
        GameRules::for_variant(variant).with_overrides(self)
    }
}
