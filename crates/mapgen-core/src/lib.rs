//! Mapgen - fair board generation for hex-tile trading games
//!
//! This crate provides the generate-validate-retry engine, including:
//! - Board topologies for the normal and large variants
//! - Random placement of landscapes, number tokens and harbors
//! - Concurrent fairness validation with a diagnostic report
//! - Compact board codes that round-trip exactly
//!
//! # Architecture
//!
//! The engine is platform-agnostic. It can be compiled to:
//! - Native Rust for the WebSocket service and the command line tool
//! - WebAssembly for generating boards in the browser
//!
//! # Modules
//!
//! - [`hex`]: Axial coordinates and the corners where hexes meet
//! - [`tile`]: Landscapes, number tokens, harbors and their codes
//! - [`topology`]: Board shapes and tile pools per variant
//! - [`rules`]: Fairness limits
//! - [`board`]: A filled board
//! - [`generator`]: Random placement
//! - [`validation`]: Fairness checks
//! - [`codec`]: Board codes and their legend
//! - [`mapgen`]: Retry loop and public entry points
//! - [`events`]: Analytics hooks
//! - [`render`]: Text rendering for terminals

pub mod board;
pub mod codec;
pub mod events;
pub mod generator;
pub mod hex;
pub mod mapgen;
pub mod render;
pub mod rules;
pub mod tile;
pub mod topology;
pub mod validation;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use board::{Board, BoardJson, HarborJson, HarborPlacement, TileJson};
pub use codec::{legend, DecodeError, Legend, LegendEntry};
pub use events::{EventSink, GenerationEvent, GenerationOutcome, NoopSink};
pub use hex::{EdgeDirection, HexCoord, VertexCoord, VertexDirection};
pub use mapgen::{
    decode_board_from_code, decode_board_with, generate_board, generate_board_code, generate_board_with,
    produce_valid_board, GeneratedBoard, GenerationError, MapGenError,
};
pub use render::{HexRenderer, RenderStrategy, RowRenderer};
pub use rules::{GameRules, RulesOverrides};
pub use tile::{Harbor, Landscape, NumberToken, Resource, Tile};
pub use topology::{CellRef, HarborSite, Topology, TopologyCatalog, Variant};
pub use validation::{is_valid, validate, Check, CheckOutcome, ValidationReport};
