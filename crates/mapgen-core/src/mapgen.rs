//! Entry points: generate fair boards and decode board codes.
//!
//! Generation is a bounded retry loop: deal a candidate board, validate it,
//! keep it if it passes, otherwise deal again. The budget is counted in
//! attempts (`GameRules::max_attempts`), never in time.

use crate::board::Board;
use crate::codec::{self, DecodeError};
use crate::events::{EventSink, GenerationEvent, GenerationOutcome, NoopSink};
use crate::generator;
use crate::rules::GameRules;
use crate::topology::{Topology, TopologyCatalog, Variant};
use crate::validation;
use rand::Rng;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("No valid {variant} board found in {attempts} attempts")]
    Exhausted { variant: Variant, attempts: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapGenError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A board that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBoard {
    pub board: Board,
    /// Candidate boards dealt, including the accepted one
    pub attempts: u32,
}

/// Deal and validate candidates until one passes or the budget runs out
pub fn produce_valid_board<R: Rng + ?Sized>(
    topology: &Arc<Topology>,
    rules: &GameRules,
    rng: &mut R,
) -> Result<GeneratedBoard, GenerationError> {
    let mut attempts = 0;
    while attempts < rules.max_attempts {
        attempts += 1;
        let board = generator::generate(topology, rng);
        let report = validation::validate(&board, rules);
        if report.is_valid() {
            return Ok(GeneratedBoard { board, attempts });
        }
        debug!(
            attempt = attempts,
            failed = ?report.failures().map(|o| o.check.name()).collect::<Vec<_>>(),
            "rejected candidate board"
        );
    }

    Err(GenerationError::Exhausted {
        variant: topology.variant(),
        attempts,
    })
}

/// Generate a valid board using the thread-local RNG
pub fn generate_board(topology: &Arc<Topology>, rules: &GameRules) -> Result<GeneratedBoard, MapGenError> {
    generate_board_with(topology, rules, &mut rand::thread_rng(), &NoopSink)
}

/// Generate a valid board, reporting the call to `events`
pub fn generate_board_with<R: Rng + ?Sized>(
    topology: &Arc<Topology>,
    rules: &GameRules,
    rng: &mut R,
    events: &dyn EventSink,
) -> Result<GeneratedBoard, MapGenError> {
    let start = Instant::now();
    let result = produce_valid_board(topology, rules, rng);
    let elapsed = start.elapsed();

    let (outcome, attempts) = match &result {
        Ok(generated) => {
            info!(
                variant = %topology.variant(),
                attempts = generated.attempts,
                ?elapsed,
                "generated board"
            );
            (GenerationOutcome::Generated, generated.attempts)
        }
        Err(GenerationError::Exhausted { attempts, .. }) => {
            warn!(variant = %topology.variant(), attempts, ?elapsed, "gave up generating board");
            (GenerationOutcome::Exhausted, *attempts)
        }
    };
    events.record(GenerationEvent {
        variant: Some(topology.variant()),
        outcome,
        attempts,
        elapsed,
    });

    result.map_err(MapGenError::from)
}

/// Generate a valid board and return its code with the attempts it took
pub fn generate_board_code(
    topology: &Arc<Topology>,
    rules: &GameRules,
    delimited: bool,
) -> Result<(String, u32), MapGenError> {
    let generated = generate_board(topology, rules)?;
    Ok((generated.board.game_code(delimited).to_string(), generated.attempts))
}

/// Decode a board code, picking the variant from the code length
pub fn decode_board_from_code(code: &str, catalog: &TopologyCatalog) -> Result<Board, MapGenError> {
    decode_board_with(code, catalog, &NoopSink)
}

/// Decode a board code, reporting the call to `events`
pub fn decode_board_with(
    code: &str,
    catalog: &TopologyCatalog,
    events: &dyn EventSink,
) -> Result<Board, MapGenError> {
    let start = Instant::now();
    let length = code.chars().count();
    let variant = Variant::from_code_length(length);

    let result = match variant {
        Some(variant) => codec::decode(code, catalog.get(variant)),
        None => {
            warn!(length, "board code matches no variant");
            Err(DecodeError::UnrecognizedLength { length })
        }
    };
    let outcome = match result {
        Ok(_) => GenerationOutcome::Decoded,
        Err(_) => GenerationOutcome::DecodeFailed,
    };
    events.record(GenerationEvent {
        variant,
        outcome,
        attempts: 0,
        elapsed: start.elapsed(),
    });

    result.map_err(MapGenError::from)
}
