mod observability;

pub mod utility;

pub use packmule_primitives::error::ApiError;

use crate::utility::logging::setup_logging;
use crate::utility::server::serve;
use crate::utility::store::create_store;
use crate::utility::sweep_tasks::spawn_background_tasks;
use crate::utility::tasks::{build_router, load_env};
use eyre::Report;
use packmule_core::app_state::AppState;
use packmule_primitives::models::app_config::AppConfig;
use tracing::info;

pub async fn run() -> Result<(), Report> {
    // 1. load environment variables
    load_env();

    // 2. initialize logging first (so we can log everything else)
    setup_logging();

    info!("Starting Packmule application...");

    // 3. load configuration
    let config = AppConfig::from_env()?;

    // 4. pick the booking store backend
    let store = create_store()?;

    // 5. build application state
    let state = AppState::new(store, config)?;

    // 6. start the auto-release sweep task
    spawn_background_tasks(state.clone());

    // 7. initialize metrics
    let (metric_layer, metric_handle) = observability::metrics::setup_metrics();

    // 8. build axum router
    let app = build_router(state.clone(), metric_layer, metric_handle)?;

    // 9. start HTTP server
    serve(app).await?;

    info!("Packmule application shut down gracefully");
    Ok(())
}
