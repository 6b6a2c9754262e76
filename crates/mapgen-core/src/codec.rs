//! Board codes: a compact, shareable string form of a board.
//!
//! Every cell takes three characters in row-major order:
//! - landscape: `0` desert, `1` forest, `2` pasture, `3` field, `4` hill, `5` mountain
//! - number: `a`..`j` for 2, 3, 4, 5, 6, 8, 9, 10, 11, 12 and `z` for none
//! - harbor: `0` generic 3:1, `1`..`5` the 2:1 harbors, `6` for none
//!
//! Codes from older generators wrote the desert as `6`; those codes fail to
//! decode with [`DecodeError::InvalidLandscape`] rather than being translated.
//!
//! A delimited code appends `_` after every row. Decoding accepts both forms
//! and rebuilds the exact board that was encoded.

use crate::board::Board;
use crate::tile::{Harbor, Landscape, NumberToken, Tile, NO_HARBOR_CODE, NO_NUMBER_CODE};
use crate::topology::Topology;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Separator appended after each row in delimited codes
pub const ROW_DELIMITER: char = '_';

/// Characters used per cell
pub const CHARS_PER_CELL: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("A code of {length} characters does not match any board")]
    UnrecognizedLength { length: usize },
    #[error("Expected {expected} characters but found {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("'{found}' is not a valid landscape code (cell {cell}, offset {offset})")]
    InvalidLandscape { found: char, cell: usize, offset: usize },
    #[error("'{found}' is not a valid number code (cell {cell}, offset {offset})")]
    InvalidNumber { found: char, cell: usize, offset: usize },
    #[error("'{found}' is not a valid harbor code (cell {cell}, offset {offset})")]
    InvalidHarbor { found: char, cell: usize, offset: usize },
    #[error("The desert at cell {cell} carries a number")]
    NumberOnDesert { cell: usize },
    #[error("Cell {cell} is missing its number")]
    MissingNumber { cell: usize },
}

impl DecodeError {
    /// The cell the error points at, if any
    pub fn cell(&self) -> Option<usize> {
        match self {
            DecodeError::InvalidLandscape { cell, .. }
            | DecodeError::InvalidNumber { cell, .. }
            | DecodeError::InvalidHarbor { cell, .. }
            | DecodeError::NumberOnDesert { cell }
            | DecodeError::MissingNumber { cell } => Some(*cell),
            DecodeError::UnrecognizedLength { .. } | DecodeError::WrongLength { .. } => None,
        }
    }
}

/// Length of a code for `topology`
pub fn code_length(topology: &Topology, delimited: bool) -> usize {
    let delimiters = if delimited { topology.row_count() } else { 0 };
    topology.total_cells() * CHARS_PER_CELL + delimiters
}

pub fn encode(board: &Board, delimited: bool) -> String {
    let mut code = String::with_capacity(code_length(board.topology(), delimited));
    for row in board.rows() {
        for tile in row {
            code.push(tile.landscape.code());
            code.push(tile.number.map_or(NO_NUMBER_CODE, |n| n.code()));
            code.push(tile.harbor.map_or(NO_HARBOR_CODE, |h| h.code()));
        }
        if delimited {
            code.push(ROW_DELIMITER);
        }
    }
    code
}

/// Rebuild the board a code describes.
///
/// Row delimiters are removed when there is exactly one per row. Decoding
/// stops at the first bad character; offsets count characters of the code
/// without delimiters.
pub fn decode(code: &str, topology: &Arc<Topology>) -> Result<Board, DecodeError> {
    let chars: Vec<char> = if code.matches(ROW_DELIMITER).count() == topology.row_count() {
        code.chars().filter(|c| *c != ROW_DELIMITER).collect()
    } else {
        code.chars().collect()
    };

    let expected = code_length(topology, false);
    if chars.len() != expected {
        return Err(DecodeError::WrongLength {
            expected,
            actual: chars.len(),
        });
    }

    let tiles = chars
        .chunks_exact(CHARS_PER_CELL)
        .enumerate()
        .map(|(cell, triplet)| decode_tile(cell, triplet))
        .collect::<Result<Vec<Tile>, DecodeError>>()
        .inspect_err(|err| warn!(variant = %topology.variant(), %err, "failed to decode board code"))?;

    Ok(Board::from_tiles(Arc::clone(topology), tiles))
}

fn decode_tile(cell: usize, triplet: &[char]) -> Result<Tile, DecodeError> {
    let offset = cell * CHARS_PER_CELL;
    let (landscape_code, number_code, harbor_code) = (triplet[0], triplet[1], triplet[2]);

    let landscape = Landscape::from_code(landscape_code).ok_or(DecodeError::InvalidLandscape {
        found: landscape_code,
        cell,
        offset,
    })?;

    let number = if number_code == NO_NUMBER_CODE {
        None
    } else {
        Some(
            NumberToken::from_code(number_code).ok_or(DecodeError::InvalidNumber {
                found: number_code,
                cell,
                offset: offset + 1,
            })?,
        )
    };
    match (landscape, number) {
        (Landscape::Desert, Some(_)) => return Err(DecodeError::NumberOnDesert { cell }),
        (Landscape::Desert, None) => {}
        (_, None) => return Err(DecodeError::MissingNumber { cell }),
        (_, Some(_)) => {}
    }

    let harbor = if harbor_code == NO_HARBOR_CODE {
        None
    } else {
        Some(
            Harbor::from_code(harbor_code).ok_or(DecodeError::InvalidHarbor {
                found: harbor_code,
                cell,
                offset: offset + 2,
            })?,
        )
    };

    Ok(Tile {
        landscape,
        number,
        harbor,
    })
}

/// Name of a code element and the character it is written as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub name: String,
    pub code: char,
}

/// Every code character, so clients can read board codes themselves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legend {
    pub landscapes: Vec<LegendEntry>,
    pub numbers: Vec<LegendEntry>,
    pub harbors: Vec<LegendEntry>,
}

pub fn legend() -> Legend {
    let entry = |name: String, code: char| LegendEntry { name, code };

    let landscapes = Landscape::ALL
        .iter()
        .map(|l| entry(l.name().to_string(), l.code()))
        .collect();

    let numbers = NumberToken::VALUES
        .into_iter()
        .filter_map(NumberToken::new)
        .map(|n| entry(n.value().to_string(), n.code()))
        .chain(std::iter::once(entry("None".to_string(), NO_NUMBER_CODE)))
        .collect();

    let harbors = Harbor::ALL
        .iter()
        .map(|h| entry(h.name(), h.code()))
        .chain(std::iter::once(entry("None".to_string(), NO_HARBOR_CODE)))
        .collect();

    Legend {
        landscapes,
        numbers,
        harbors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator;
    use crate::tile::Resource;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn normal() -> Arc<Topology> {
        Arc::new(Topology::normal())
    }

    #[test]
    fn test_round_trip_both_forms() {
        for topology in [Topology::normal(), Topology::large()] {
            let topology = Arc::new(topology);
            let board = generator::generate(&topology, &mut StdRng::seed_from_u64(17));

            let plain = encode(&board, false);
            let delimited = encode(&board, true);
            assert_eq!(plain.len(), code_length(&topology, false));
            assert_eq!(delimited.len(), code_length(&topology, true));

            assert_eq!(decode(&plain, &topology).unwrap(), board);
            assert_eq!(decode(&delimited, &topology).unwrap(), board);
        }
    }

    #[test]
    fn test_code_lengths() {
        assert_eq!(code_length(&Topology::normal(), false), 57);
        assert_eq!(code_length(&Topology::normal(), true), 62);
        assert_eq!(code_length(&Topology::large(), false), 90);
        assert_eq!(code_length(&Topology::large(), true), 97);
    }

    #[test]
    fn test_decode_reads_each_triplet() {
        // 18 producing cells followed by the desert
        let code = format!("1a61b5{}0z6", "2c6".repeat(16));
        let board = decode(&code, &normal()).unwrap();

        let first = board.tile(0).unwrap();
        assert_eq!(first.landscape, Landscape::Forest);
        assert_eq!(first.number.map(|n| n.value()), Some(2));
        assert_eq!(first.harbor, None);

        let second = board.tile(1).unwrap();
        assert_eq!(second.landscape, Landscape::Forest);
        assert_eq!(second.number.map(|n| n.value()), Some(3));
        assert_eq!(second.harbor, Some(Harbor::Specific(Resource::Ore)));

        assert!(board.tile(18).unwrap().is_desert());
        assert_eq!(encode(&board, false), code);
    }

    #[test]
    fn test_invalid_landscape_names_the_cell() {
        let mut code: Vec<char> = encode(
            &generator::generate(&normal(), &mut StdRng::seed_from_u64(2)),
            false,
        )
        .chars()
        .collect();
        code[3 * 4] = '9';
        let code: String = code.into_iter().collect();

        let err = decode(&code, &normal()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidLandscape {
                found: '9',
                cell: 4,
                offset: 12
            }
        );
        assert_eq!(err.cell(), Some(4));
    }

    #[test]
    fn test_legacy_desert_code_is_rejected() {
        let code = format!("1a61b5{}6z6", "2c6".repeat(16));
        assert_eq!(
            decode(&code, &normal()).unwrap_err(),
            DecodeError::InvalidLandscape {
                found: '6',
                cell: 18,
                offset: 54
            }
        );
    }

    #[test]
    fn test_invalid_number_and_harbor() {
        let board = generator::generate(&normal(), &mut StdRng::seed_from_u64(4));
        let code = encode(&board, false);
        let producing = board.tiles().iter().position(|t| !t.is_desert()).unwrap();

        let mut bad_number: Vec<char> = code.chars().collect();
        bad_number[producing * 3 + 1] = 'q';
        let err = decode(&bad_number.into_iter().collect::<String>(), &normal()).unwrap_err();
        assert_eq!(err.cell(), Some(producing));
        assert!(matches!(err, DecodeError::InvalidNumber { found: 'q', .. }));

        let mut bad_harbor: Vec<char> = code.chars().collect();
        bad_harbor[producing * 3 + 2] = '7';
        let err = decode(&bad_harbor.into_iter().collect::<String>(), &normal()).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidHarbor { found: '7', .. }));
    }

    #[test]
    fn test_number_must_match_desert() {
        let board = generator::generate(&normal(), &mut StdRng::seed_from_u64(6));
        let code = encode(&board, false);
        let desert = board.tiles().iter().position(|t| t.is_desert()).unwrap();
        let producing = board.tiles().iter().position(|t| !t.is_desert()).unwrap();

        let mut chars: Vec<char> = code.chars().collect();
        chars[desert * 3 + 1] = 'e';
        let err = decode(&chars.into_iter().collect::<String>(), &normal()).unwrap_err();
        assert_eq!(err, DecodeError::NumberOnDesert { cell: desert });

        let mut chars: Vec<char> = code.chars().collect();
        chars[producing * 3 + 1] = NO_NUMBER_CODE;
        let err = decode(&chars.into_iter().collect::<String>(), &normal()).unwrap_err();
        assert_eq!(err, DecodeError::MissingNumber { cell: producing });
    }

    #[test]
    fn test_wrong_length() {
        let err = decode("1a6", &normal()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::WrongLength {
                expected: 57,
                actual: 3
            }
        );
    }

    #[test]
    fn test_delimiters_kept_when_count_is_off() {
        let board = generator::generate(&normal(), &mut StdRng::seed_from_u64(8));
        let mut code = encode(&board, true);
        code.push(ROW_DELIMITER);
        assert!(matches!(
            decode(&code, &normal()),
            Err(DecodeError::WrongLength { actual: 63, .. })
        ));
    }

    #[test]
    fn test_legend_covers_every_code() {
        let legend = legend();
        assert_eq!(legend.landscapes.len(), 6);
        assert_eq!(legend.numbers.len(), 11);
        assert_eq!(legend.harbors.len(), 7);
        assert_eq!(legend.numbers.last().unwrap().code, NO_NUMBER_CODE);
        assert_eq!(
            legend.harbors[0],
            LegendEntry {
                name: "3:1".to_string(),
                code: '0'
            }
        );
    }
}
