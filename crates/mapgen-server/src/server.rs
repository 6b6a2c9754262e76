//! WebSocket server and connection handling.

use crate::protocol::{ClientMessage, MapResponse, ServerMessage};
use crate::stats::{ChannelSink, GenerationStats};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use mapgen_core::{
    decode_board_with, generate_board_with, legend, Board, GameRules, GeneratedBoard, MapGenError, RulesOverrides,
    TopologyCatalog, Variant,
};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    MapGen(#[from] MapGenError),

    #[error("Generation task failed: {0}")]
    Task(#[from] JoinError),
}

/// Server state shared across all connections.
pub struct ServerState {
    /// Board shapes, built once at startup
    pub catalog: TopologyCatalog,
    /// Mapping from connection ID to its message sender
    pub connections: DashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
    pub stats: Arc<GenerationStats>,
    sink: ChannelSink,
}

impl ServerState {
    pub fn new(sink: ChannelSink, stats: Arc<GenerationStats>) -> Self {
        Self {
            catalog: TopologyCatalog::new(),
            connections: DashMap::new(),
            stats,
            sink,
        }
    }

    /// Send a message to a specific connection.
    pub fn send_to(&self, connection_id: Uuid, msg: ServerMessage) {
        if let Some(sender) = self.connections.get(&connection_id) {
            let _ = sender.send(msg);
        }
    }

    /// Generate a board on the blocking pool.
    async fn generate(&self, variant: Variant, overrides: RulesOverrides) -> Result<GeneratedBoard, RequestError> {
        let topology = Arc::clone(self.catalog.get(variant));
        let rules = request_rules(variant, &overrides);
        let sink = self.sink.clone();

        let generated = tokio::task::spawn_blocking(move || {
            generate_board_with(&topology, &rules, &mut rand::thread_rng(), &sink)
        })
        .await??;
        Ok(generated)
    }

    fn decode(&self, code: &str) -> Result<Board, RequestError> {
        Ok(decode_board_with(code, &self.catalog, &self.sink)?)
    }
}

/// Rules for a client request. Clients may tighten the attempt budget but
/// never raise it above the variant default.
pub fn request_rules(variant: Variant, overrides: &RulesOverrides) -> GameRules {
    let rules = overrides.resolve(variant);
    let budget = GameRules::for_variant(variant).max_attempts;
    GameRules {
        max_attempts: rules.max_attempts.min(budget),
        ..rules
    }
}

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Map generator listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(stream: TcpStream, addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let connection_id = Uuid::new_v4();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.connections.insert(connection_id, tx);

    let welcome = ServerMessage::Welcome { connection_id };
    let msg_text = serde_json::to_string(&welcome)?;
    ws_sender.send(Message::Text(msg_text)).await?;

    // Spawn task to forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        }
    });

    // Handle incoming messages; each request runs on its own task so a slow
    // generation does not hold up the rest of the connection
    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => {
                    let state = Arc::clone(&state);
                    tokio::spawn(async move {
                        let reply = handle_message(client_msg, &state).await;
                        state.send_to(connection_id, reply);
                    });
                }
                Err(e) => {
                    warn!("Invalid message from {}: {}", connection_id, text);
                    state.send_to(
                        connection_id,
                        ServerMessage::Error {
                            request_id: None,
                            message: format!("Invalid message: {}", e),
                        },
                    );
                }
            },
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", connection_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                state.send_to(connection_id, ServerMessage::Pong);
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", connection_id, e);
                break;
            }
            _ => {}
        }
    }

    // Clean up on disconnect
    state.connections.remove(&connection_id);
    send_task.abort();

    info!("Connection closed for {}", connection_id);
    Ok(())
}

/// Produce the reply to a client message.
pub async fn handle_message(msg: ClientMessage, state: &Arc<ServerState>) -> ServerMessage {
    let request_id = Uuid::new_v4();

    let result = match msg {
        ClientMessage::GenerateMap {
            variant,
            rules,
            delimiter,
        } => state.generate(variant, rules).await.map(|generated| ServerMessage::Map {
            request_id,
            map: map_response(&generated.board, generated.attempts, delimiter),
        }),

        ClientMessage::GenerateCode {
            variant,
            rules,
            delimiter,
        } => state.generate(variant, rules).await.map(|generated| ServerMessage::Code {
            request_id,
            code: generated.board.game_code(delimiter).to_string(),
            attempts: generated.attempts,
        }),

        ClientMessage::MapByCode { code } => state.decode(&code).map(|board| {
            let delimited = code.contains(mapgen_core::codec::ROW_DELIMITER);
            ServerMessage::Map {
                request_id,
                map: map_response(&board, 0, delimited),
            }
        }),

        ClientMessage::Legend => Ok(ServerMessage::Legend { legend: legend() }),

        ClientMessage::Stats => Ok(ServerMessage::Stats {
            stats: state.stats.snapshot(),
            unrecognized_codes: state.stats.unrecognized_codes(),
        }),

        ClientMessage::Ping => Ok(ServerMessage::Pong),
    };

    result.unwrap_or_else(|e| {
        warn!(%request_id, "request failed: {}", e);
        ServerMessage::Error {
            request_id: Some(request_id),
            message: e.to_string(),
        }
    })
}

fn map_response(board: &Board, attempts: u32, delimited: bool) -> MapResponse {
    MapResponse {
        game_code: board.game_code(delimited).to_string(),
        attempts,
        board: board.to_json_friendly(),
    }
}
