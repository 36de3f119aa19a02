//! Background scheduler for the periodic notification run.
//!
//! The `POST /api/notifications/run` endpoint stays the authoritative
//! trigger for external cron; this loop is the self-hosted equivalent.

use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{info, warn};

use crate::main_lib::AppState;

/// Run interval: 1 hour (not user-configurable to prevent provider abuse)
const RUN_INTERVAL_SECS: u64 = 60 * 60;

/// Initial delay before the first run (60 seconds to let the server fully start)
const INITIAL_DELAY_SECS: u64 = 60;

/// Starts the background notification scheduler.
pub fn start_notification_scheduler(state: Arc<AppState>) {
    tokio::spawn(async move {
        info!("Notification scheduler started (1-hour interval)");

        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        run_scheduled_dispatch(&state).await;

        let mut run_interval = interval(Duration::from_secs(RUN_INTERVAL_SECS));
        // The first tick fires immediately and would double up with the run above.
        run_interval.tick().await;

        loop {
            run_interval.tick().await;
            run_scheduled_dispatch(&state).await;
        }
    });
}

/// Runs a single scheduled notification dispatch plus log maintenance.
async fn run_scheduled_dispatch(state: &Arc<AppState>) {
    info!("Running scheduled notification dispatch...");

    match state.notification_service.run().await {
        Ok(summary) => {
            info!(
                "Scheduled notification run completed: {} sent, {} skipped, {} errors",
                summary.sent, summary.skipped, summary.errors
            );
        }
        Err(e) => {
            warn!("Scheduled notification run failed: {}", e);
        }
    }

    match state.notification_service.prune_log().await {
        Ok(pruned) if pruned > 0 => {
            info!("Pruned {} expired notification log rows", pruned);
        }
        Ok(_) => {}
        Err(e) => {
            warn!("Notification log prune failed: {}", e);
        }
    }
}
