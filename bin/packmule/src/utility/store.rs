use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use eyre::Report;
use packmule_core::repositories::{BookingStore, MemoryStore, PgStore};
use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Postgres when `DATABASE_URL` is set, ephemeral in-memory store otherwise.
pub fn create_store() -> Result<Arc<dyn BookingStore>, Report> {
    match env::var("DATABASE_URL") {
        Ok(raw) => {
            let db_url = SecretString::from(raw);

            let manager = ConnectionManager::<PgConnection>::new(db_url.expose_secret());

            let pool = Pool::builder()
                .max_size(50)
                .min_idle(Some(5))
                .connection_timeout(Duration::from_secs(8))
                .idle_timeout(Some(Duration::from_secs(300)))
                .max_lifetime(Some(Duration::from_secs(1800)))
                .test_on_check_out(true)
                .build(manager)?;

            info!("PostgreSQL connection pool created (max_size: 50)");

            Ok(Arc::new(PgStore::new(pool)))
        }
        Err(_) => {
            warn!("DATABASE_URL not set, using in-memory store; all state is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
