//! WebSocket protocol messages for the map generator service.

use mapgen_core::{BoardJson, Legend, RulesOverrides, Variant};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Generate a board and return it in full
    GenerateMap {
        #[serde(default)]
        variant: Variant,
        #[serde(default)]
        rules: RulesOverrides,
        /// Use the delimited form of the board code
        #[serde(default)]
        delimiter: bool,
    },

    /// Generate a board and return only its code
    GenerateCode {
        #[serde(default)]
        variant: Variant,
        #[serde(default)]
        rules: RulesOverrides,
        #[serde(default)]
        delimiter: bool,
    },

    /// Rebuild a board from its code
    MapByCode { code: String },

    /// Request the meaning of every code character
    Legend,

    /// Request generation statistics
    Stats,

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with assigned connection ID
    Welcome { connection_id: Uuid },

    /// A generated or decoded board
    Map { request_id: Uuid, map: MapResponse },

    /// A generated board code
    Code {
        request_id: Uuid,
        code: String,
        attempts: u32,
    },

    /// Code legend
    Legend { legend: Legend },

    /// Generation statistics per variant
    Stats {
        stats: Vec<VariantStats>,
        /// Codes whose length matched no variant
        unrecognized_codes: u64,
    },

    /// Error occurred
    Error {
        request_id: Option<Uuid>,
        message: String,
    },

    /// Pong response
    Pong,
}

/// A board as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapResponse {
    pub game_code: String,
    /// Candidate boards drawn; zero for decoded boards
    pub attempts: u32,
    #[serde(flatten)]
    pub board: BoardJson,
}

/// Aggregated counters for one variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantStats {
    pub variant: Variant,
    pub generated: u64,
    pub exhausted: u64,
    pub decoded: u64,
    pub decode_failures: u64,
    /// Attempts summed over every generation request
    pub total_attempts: u64,
}

impl VariantStats {
    /// Mean attempts per successful generation
    pub fn average_attempts(&self) -> Option<u64> {
        self.total_attempts.checked_div(self.generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_client_message_serialization() {
        let msg = ClientMessage::MapByCode {
            code: "1a6".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("MapByCode"));
        assert!(json.contains("1a6"));

        let parsed: ClientMessage = serde_json::from_str(&json).unwrap();
        match parsed {
            ClientMessage::MapByCode { code } => assert_eq!(code, "1a6"),
            _ => panic!("Wrong message type"),
        }
    }

    #[test]
    fn test_generate_request_defaults() {
        let json = r#"{"type": "GenerateCode", "payload": {"variant": "large", "rules": {"max300": 20}}}"#;
        match serde_json::from_str::<ClientMessage>(json).unwrap() {
            ClientMessage::GenerateCode {
                variant,
                rules,
                delimiter,
            } => {
                assert_eq!(variant, Variant::Large);
                assert_eq!(rules.max300, Some(20));
                assert_eq!(rules.min, None);
                assert!(!delimiter);
            }
            other => panic!("Wrong message type: {other:?}"),
        }

        let json = r#"{"type": "GenerateMap", "payload": {}}"#;
        assert!(matches!(
            serde_json::from_str::<ClientMessage>(json).unwrap(),
            ClientMessage::GenerateMap {
                variant: Variant::Normal,
                delimiter: false,
                ..
            }
        ));
    }

    #[test]
    fn test_unit_messages() {
        let parsed: ClientMessage = serde_json::from_str(r#"{"type": "Legend"}"#).unwrap();
        assert!(matches!(parsed, ClientMessage::Legend));

        let json = serde_json::to_string(&ServerMessage::Pong).unwrap();
        assert_eq!(json, r#"{"type":"Pong"}"#);
    }

    #[test]
    fn test_error_message_shape() {
        let msg = ServerMessage::Error {
            request_id: None,
            message: "bad code".to_string(),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "Error");
        assert_eq!(value["payload"]["message"], "bad code");
    }

    #[test]
    fn test_average_attempts() {
        let stats = VariantStats {
            generated: 4,
            total_attempts: 100,
            ..Default::default()
        };
        assert_eq!(stats.average_attempts(), Some(25));
        assert_eq!(VariantStats::default().average_attempts(), None);
    }
}
