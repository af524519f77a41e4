//! Focus room server: HTTP API, realtime channel and background tasks.

mod handler;
mod reaper;
mod server;
mod signal;
pub mod state;

pub use reaper::{DEFAULT_REAPER_INTERVAL_SECS, ReaperConfig, start_reaper};
pub use server::Server;
pub use signal::shutdown_signal;
pub use state::AppState;
