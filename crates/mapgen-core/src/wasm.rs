//! WebAssembly bindings for the map generator.
//!
//! This module exposes generation and decoding to JavaScript through
//! wasm-bindgen. Boards cross the boundary as JSON strings.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::codec;
#[cfg(feature = "wasm")]
use crate::mapgen::produce_valid_board;
#[cfg(feature = "wasm")]
use crate::rules::RulesOverrides;
#[cfg(feature = "wasm")]
use crate::topology::{TopologyCatalog, Variant};

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed generator holding both board shapes
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmMapGenerator {
    catalog: TopologyCatalog,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmMapGenerator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmMapGenerator {
        WasmMapGenerator {
            catalog: TopologyCatalog::new(),
        }
    }

    /// Generate a board and return its code.
    ///
    /// `rules_json` holds optional overrides (`{"max300": 12}`), or is empty.
    #[wasm_bindgen(js_name = generateCode)]
    pub fn generate_code(&self, variant: &str, rules_json: &str, delimited: bool) -> Result<String, JsValue> {
        let (variant, overrides) = parse_request(variant, rules_json)?;
        let generated = produce_valid_board(
            self.catalog.get(variant),
            &overrides.resolve(variant),
            &mut rand::thread_rng(),
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(generated.board.game_code(delimited).to_string())
    }

    /// Generate a board and return it as JSON
    #[wasm_bindgen(js_name = generateMap)]
    pub fn generate_map(&self, variant: &str, rules_json: &str) -> Result<String, JsValue> {
        let (variant, overrides) = parse_request(variant, rules_json)?;
        let generated = produce_valid_board(
            self.catalog.get(variant),
            &overrides.resolve(variant),
            &mut rand::thread_rng(),
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_json::to_string(&generated.board.to_json_friendly())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Decode a board code into board JSON
    #[wasm_bindgen]
    pub fn decode(&self, code: &str) -> Result<String, JsValue> {
        let length = code.chars().count();
        let variant = Variant::from_code_length(length)
            .ok_or_else(|| JsValue::from_str(&codec::DecodeError::UnrecognizedLength { length }.to_string()))?;
        let board = codec::decode(code, self.catalog.get(variant))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_json::to_string(&board.to_json_friendly()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Names of every code character as JSON
    #[wasm_bindgen]
    pub fn legend(&self) -> String {
        serde_json::to_string(&codec::legend()).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(feature = "wasm")]
impl Default for WasmMapGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "wasm")]
fn parse_request(variant: &str, rules_json: &str) -> Result<(Variant, RulesOverrides), JsValue> {
    let variant: Variant = variant.parse().map_err(|e: String| JsValue::from_str(&e))?;
    let overrides = if rules_json.trim().is_empty() {
        RulesOverrides::default()
    } else {
        serde_json::from_str(rules_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid rules: {}", e)))?
    };
    Ok((variant, overrides))
}
