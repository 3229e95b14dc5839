use packmule_core::services::settlement_service::SettlementService;
use packmule_core::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info};

pub fn spawn_background_tasks(state: Arc<AppState>) {
    tokio::spawn(async move {
        info!("Starting auto-release sweep task");
        auto_release_sweep(state).await;
    });

    info!("Background maintenance tasks spawned");
}

/// Periodic counterpart of the `/api/internal/release_sweep` endpoint.
async fn auto_release_sweep(state: Arc<AppState>) {
    let mut interval = interval(Duration::from_secs(
        state.config.settlement.sweep_interval_secs,
    ));

    // skip the immediate tick on startup
    interval.tick().await;

    loop {
        interval.tick().await;

        match SettlementService::run_release_sweep(&state).await {
            Ok(report) if report.processed == 0 => {
                info!("Auto-release sweep: nothing due");
            }
            Ok(report) => {
                info!(
                    processed = report.processed,
                    released = report.released,
                    failed = report.errors.len(),
                    "Auto-release sweep completed"
                );
            }
            Err(e) => {
                error!("Auto-release sweep failed: {}", e);
            }
        }
    }
}
