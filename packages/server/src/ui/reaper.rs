//! Expired room reaper background task.
//!
//! Periodically deletes rooms whose `expiresAt` has passed. The task exits
//! when its cancellation token is triggered, after finishing the current sweep.

use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::usecase::ReapExpiredRoomsUseCase;

/// Default sweep interval in seconds.
pub const DEFAULT_REAPER_INTERVAL_SECS: u64 = 30;

/// Configuration for the reaper task.
#[derive(Debug, Clone)]
pub struct ReaperConfig {
    pub interval: Duration,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_REAPER_INTERVAL_SECS),
        }
    }
}

impl ReaperConfig {
    /// A zero interval is clamped to one second.
    pub fn from_secs(secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(secs.max(1)),
        }
    }
}

/// Run the sweep loop until `cancel_token` is cancelled.
pub async fn start_reaper(
    usecase: Arc<ReapExpiredRoomsUseCase>,
    config: ReaperConfig,
    cancel_token: CancellationToken,
) {
    tracing::info!(
        interval_secs = config.interval.as_secs(),
        "Starting expired room reaper"
    );

    let mut interval = tokio::time::interval(config.interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => run_sweep(&usecase).await,
            _ = cancel_token.cancelled() => {
                tracing::info!("Reaper received shutdown signal, exiting");
                break;
            }
        }
    }

    tracing::info!("Expired room reaper stopped");
}

async fn run_sweep(usecase: &ReapExpiredRoomsUseCase) {
    match usecase.execute().await {
        Ok(reaped) if !reaped.is_empty() => {
            tracing::debug!(count = reaped.len(), "Sweep finished");
        }
        Ok(_) => {}
        Err(e) => tracing::error!("Expired room sweep failed: {}", e),
    }
}
