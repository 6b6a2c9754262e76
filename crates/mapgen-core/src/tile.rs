//! Tile contents: landscapes, resources, number tokens and harbors.
//!
//! Every value that can sit on a cell has a single-character code. The codes
//! are part of the shareable board code (see [`crate::codec`]) and must never
//! change.

use serde::{Deserialize, Serialize};

/// Code used for a cell without a number token (the desert).
pub const NO_NUMBER_CODE: char = 'z';

/// Code used for a cell without a harbor.
pub const NO_HARBOR_CODE: char = '6';

/// Probability score above which an adjacent triple counts as "hot".
pub const HIGH_SCORE_THRESHOLD: u32 = 300;

/// Tradeable resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resource {
    Lumber,
    Wool,
    Grain,
    Brick,
    Ore,
}

impl Resource {
    /// All resource types, in code order
    pub const ALL: [Resource; 5] = [
        Resource::Lumber,
        Resource::Wool,
        Resource::Grain,
        Resource::Brick,
        Resource::Ore,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Resource::Lumber => "Lumber",
            Resource::Wool => "Wool",
            Resource::Grain => "Grain",
            Resource::Brick => "Brick",
            Resource::Ore => "Ore",
        }
    }

    /// Digit shared by the landscape producing this resource and its 2:1 harbor
    fn digit(&self) -> char {
        match self {
            Resource::Lumber => '1',
            Resource::Wool => '2',
            Resource::Grain => '3',
            Resource::Brick => '4',
            Resource::Ore => '5',
        }
    }
}

/// Landscape printed on a hex tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Landscape {
    /// Produces nothing and never carries a number
    Desert,
    Forest,
    Pasture,
    Field,
    /// Brick-producing hills (called river in some editions)
    Hill,
    Mountain,
}

impl Landscape {
    /// All landscapes, in code order
    pub const ALL: [Landscape; 6] = [
        Landscape::Desert,
        Landscape::Forest,
        Landscape::Pasture,
        Landscape::Field,
        Landscape::Hill,
        Landscape::Mountain,
    ];

    /// The resource this landscape produces
    pub fn resource(&self) -> Option<Resource> {
        match self {
            Landscape::Desert => None,
            Landscape::Forest => Some(Resource::Lumber),
            Landscape::Pasture => Some(Resource::Wool),
            Landscape::Field => Some(Resource::Grain),
            Landscape::Hill => Some(Resource::Brick),
            Landscape::Mountain => Some(Resource::Ore),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Landscape::Desert => "Desert",
            Landscape::Forest => "Forest",
            Landscape::Pasture => "Pasture",
            Landscape::Field => "Field",
            Landscape::Hill => "Hill",
            Landscape::Mountain => "Mountain",
        }
    }

    /// Position in [`Landscape::ALL`], handy for counting arrays
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn code(&self) -> char {
        self.resource().map_or('0', |r| r.digit())
    }

    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code() == code)
    }
}

/// Number token placed on a producing tile.
///
/// Only the values a pair of six-sided dice can roll, minus the 7, exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct NumberToken {
    value: u8,
}

impl NumberToken {
    /// Token values in code order (`a` through `j`)
    pub const VALUES: [u8; 10] = [2, 3, 4, 5, 6, 8, 9, 10, 11, 12];

    pub fn new(value: u8) -> Option<Self> {
        Self::VALUES.contains(&value).then_some(Self { value })
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Probability score: the chance of rolling this value, scaled so that
    /// the pips sum stays integral (2 → 27 up to 6 and 8 → 139).
    pub fn weight(&self) -> u32 {
        match self.value {
            2 | 12 => 27,
            3 | 11 => 55,
            4 | 10 => 83,
            5 | 9 => 111,
            6 | 8 => 139,
            _ => 0,
        }
    }

    pub fn code(&self) -> char {
        let position = Self::VALUES
            .iter()
            .position(|v| *v == self.value)
            .unwrap_or_default();
        (b'a' + position as u8) as char
    }

    pub fn from_code(code: char) -> Option<Self> {
        let position = (code as u32).checked_sub('a' as u32)? as usize;
        Self::VALUES
            .get(position)
            .map(|value| Self { value: *value })
    }
}

impl TryFrom<u8> for NumberToken {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("{value} is not a number token"))
    }
}

impl From<NumberToken> for u8 {
    fn from(token: NumberToken) -> u8 {
        token.value
    }
}

/// Harbor types for maritime trading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Harbor {
    /// 3:1 trade any resource
    Generic,
    /// 2:1 trade for a specific resource
    Specific(Resource),
}

impl Harbor {
    /// Every harbor kind, in code order
    pub const ALL: [Harbor; 6] = [
        Harbor::Generic,
        Harbor::Specific(Resource::Lumber),
        Harbor::Specific(Resource::Wool),
        Harbor::Specific(Resource::Grain),
        Harbor::Specific(Resource::Brick),
        Harbor::Specific(Resource::Ore),
    ];

    /// The exchange rate for this harbor
    pub fn rate(&self) -> u32 {
        match self {
            Harbor::Generic => 3,
            Harbor::Specific(_) => 2,
        }
    }

    /// The resource this harbor gives a better rate for, if any
    pub fn resource(&self) -> Option<Resource> {
        match self {
            Harbor::Generic => None,
            Harbor::Specific(resource) => Some(*resource),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Harbor::Generic => "3:1".to_string(),
            Harbor::Specific(resource) => format!("2:1 {}", resource.name()),
        }
    }

    pub fn code(&self) -> char {
        self.resource().map_or('0', |r| r.digit())
    }

    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.code() == code)
    }
}

/// A single tile of a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub landscape: Landscape,
    /// Number token, `None` on the desert
    pub number: Option<NumberToken>,
    /// Harbor anchored on this tile, if any
    pub harbor: Option<Harbor>,
}

impl Tile {
    /// A bare tile with no number and no harbor yet
    pub fn new(landscape: Landscape) -> Self {
        Self {
            landscape,
            number: None,
            harbor: None,
        }
    }

    pub fn resource(&self) -> Option<Resource> {
        self.landscape.resource()
    }

    pub fn is_desert(&self) -> bool {
        self.landscape == Landscape::Desert
    }

    /// Probability score of the number token, zero without one
    pub fn weight(&self) -> u32 {
        self.number.map_or(0, |n| n.weight())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_landscape_codes_are_digits_zero_to_five() {
        let codes: String = Landscape::ALL.iter().map(|l| l.code()).collect();
        assert_eq!(codes, "012345");
        for landscape in Landscape::ALL {
            assert_eq!(Landscape::from_code(landscape.code()), Some(landscape));
        }
        assert_eq!(Landscape::from_code('6'), None);
    }

    #[test]
    fn test_number_codes() {
        let codes: String = NumberToken::VALUES
            .iter()
            .filter_map(|v| NumberToken::new(*v))
            .map(|n| n.code())
            .collect();
        assert_eq!(codes, "abcdefghij");
        assert_eq!(NumberToken::from_code('f').map(|n| n.value()), Some(8));
        assert_eq!(NumberToken::from_code('k'), None);
        assert_eq!(NumberToken::from_code(NO_NUMBER_CODE), None);
        assert_eq!(NumberToken::from_code('A'), None);
    }

    #[test]
    fn test_no_seven_token() {
        assert!(NumberToken::new(7).is_none());
        assert!(NumberToken::new(1).is_none());
        assert!(NumberToken::new(13).is_none());
    }

    #[test]
    fn test_number_weights_are_symmetric() {
        for value in NumberToken::VALUES {
            let token = NumberToken::new(value).unwrap();
            let mirror = NumberToken::new(14 - value).unwrap();
            assert_eq!(token.weight(), mirror.weight());
        }
        assert_eq!(NumberToken::new(6).unwrap().weight(), 139);
        assert_eq!(NumberToken::new(12).unwrap().weight(), 27);
    }

    #[test]
    fn test_harbor_codes() {
        let codes: String = Harbor::ALL.iter().map(|h| h.code()).collect();
        assert_eq!(codes, "012345");
        assert_eq!(Harbor::from_code(NO_HARBOR_CODE), None);
        assert_eq!(Harbor::from_code('3'), Some(Harbor::Specific(Resource::Grain)));
    }

    #[test]
    fn test_harbor_code_matches_landscape_of_same_resource() {
        for landscape in Landscape::ALL {
            if let Some(resource) = landscape.resource() {
                assert_eq!(Harbor::Specific(resource).code(), landscape.code());
            }
        }
    }

    #[test]
    fn test_desert_has_no_resource_or_weight() {
        let tile = Tile::new(Landscape::Desert);
        assert!(tile.is_desert());
        assert_eq!(tile.resource(), None);
        assert_eq!(tile.weight(), 0);
    }

    #[test]
    fn test_number_token_serializes_as_value() {
        let token = NumberToken::new(9).unwrap();
        assert_eq!(serde_json::to_string(&token).unwrap(), "9");
        assert!(serde_json::from_str::<NumberToken>("7").is_err());
    }
}
