//! Focus room server.
//!
//! Serves the room HTTP API and the realtime channel, and sweeps expired rooms
//! in the background.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin focusroom-server
//! cargo run --bin focusroom-server -- --host 0.0.0.0 --port 3000
//! PORT=3000 FOCUSROOM_LOG_LEVEL=info cargo run --bin focusroom-server
//! ```

use std::{collections::HashMap, sync::Arc};

use clap::Parser;
use focusroom_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{
            DEFAULT_ACTIVITY_LOG_CAPACITY, InMemoryActivityLogRepository, InMemoryRoomRepository,
        },
    },
    ui::{AppState, DEFAULT_REAPER_INTERVAL_SECS, ReaperConfig, Server, start_reaper},
};
use focusroom_shared::{logger::setup_logger, time::SystemClock};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "focusroom-server")]
#[command(about = "Focus room server with chat and signaling relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "FOCUSROOM_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Seconds between expired room sweeps
    #[arg(long, env = "FOCUSROOM_REAPER_INTERVAL_SECS", default_value_t = DEFAULT_REAPER_INTERVAL_SECS)]
    reaper_interval_secs: u64,

    /// Maximum number of activity log entries kept in memory
    #[arg(long, env = "FOCUSROOM_ACTIVITY_LOG_CAPACITY", default_value_t = DEFAULT_ACTIVITY_LOG_CAPACITY)]
    activity_log_capacity: usize,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, env = "FOCUSROOM_LOG_LEVEL", default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Initialize dependencies in order:
    // 1. Repositories
    // 2. MessagePusher
    // 3. UseCases (AppState)
    // 4. Reaper task
    // 5. Server

    // 1. Create Repositories (in-memory)
    let repository = Arc::new(InMemoryRoomRepository::default());
    let activity_log = Arc::new(InMemoryActivityLogRepository::with_capacity(
        args.activity_log_capacity,
    ));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher_clients = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(message_pusher_clients));

    // 3. Create UseCases
    let state = Arc::new(AppState::new(
        repository,
        activity_log,
        message_pusher,
        Arc::new(SystemClock),
    ));

    // 4. Start the reaper
    let reaper_token = CancellationToken::new();
    let reaper_handle = tokio::spawn(start_reaper(
        state.reap_expired_rooms_usecase.clone(),
        ReaperConfig::from_secs(args.reaper_interval_secs),
        reaper_token.clone(),
    ));

    // 5. Run the server
    let result = Server::new(state).run(args.host, args.port).await;

    reaper_token.cancel();
    if let Err(e) = reaper_handle.await {
        tracing::warn!("Reaper task ended abnormally: {}", e);
    }

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
