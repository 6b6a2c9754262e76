//! Mapgen board generation server.

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod protocol;
mod server;
mod stats;

use server::ServerState;
use stats::{spawn_stats_collector, ChannelSink, GenerationStats};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse address from env or use default
    let addr: SocketAddr = std::env::var("SERVER_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()?;

    info!("Starting mapgen server...");

    let (sink, events) = ChannelSink::new();
    let stats = Arc::new(GenerationStats::new());
    spawn_stats_collector(events, Arc::clone(&stats));

    let state = Arc::new(ServerState::new(sink, stats));

    server::run_server(addr, state).await
}
