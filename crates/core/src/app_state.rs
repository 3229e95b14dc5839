use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::clients::{EscrowClient, KycClient, NotifyClient};
use crate::repositories::BookingStore;
use eyre::Result;
pub use packmule_primitives::models::app_config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookingStore>,
    pub http_client: Client,
    pub config: AppConfig,
    pub escrow: EscrowClient,
    pub kyc: KycClient,
    pub notifier: NotifyClient,
}

impl AppState {
    pub fn new(store: Arc<dyn BookingStore>, config: AppConfig) -> Result<Arc<Self>> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let escrow = EscrowClient::new(
            http.clone(),
            &config.escrow_details.api_url,
            config.escrow_details.secret_key.clone(),
        )?;

        let kyc = KycClient::new(http.clone(), &config.kyc_details.api_url)?;

        let notifier = NotifyClient::new(http.clone(), config.notify_url.as_deref());

        Ok(Arc::new(Self {
            store,
            http_client: http,
            config,
            escrow,
            kyc,
            notifier,
        }))
    }
}
