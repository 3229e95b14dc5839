use axum_test::TestServer;
use hmac::{Hmac, Mac};
use packmule_core::repositories::{BookingStore, MemoryStore};
use packmule_core::{AppState, SecurityConfig};
use packmule_primitives::models::app_config::{
    AppConfig, EscrowInfo, JwtInfo, KycInfo, PricingInfo, SettlementInfo,
};
use packmule_primitives::models::entities::enum_types::CurrencyCode;
use secrecy::SecretString;
use sha2::Sha256;
use std::sync::Arc;
use uuid::Uuid;

pub mod fixtures;

pub const WEBHOOK_SECRET: &str = "test_escrow_webhook_secret";
pub const SWEEP_SECRET: &str = "test_sweep_secret";

pub struct TestApp {
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
    pub server: TestServer,
}

/// Test configuration: KYC gate off by default, deterministic rates.
pub fn test_config(escrow_url: &str, kyc_url: &str) -> AppConfig {
    AppConfig {
        jwt_details: JwtInfo {
            jwt_secret: SecretString::from(
                "test_secret_key_minimum_32_characters_long_for_testing",
            ),
            jwt_expiration_hours: 2,
            jwt_issuer: "packmule".to_string(),
            jwt_audience: "packmule_api".to_string(),
        },
        app_url: "http://localhost:8080".to_string(),
        currency: CurrencyCode::EUR,
        max_pending_bookings: 5,
        pricing: PricingInfo {
            commission_rate: 0.12,
            insurance_rate: 0.03,
            insurance_base_fee: 0.0,
        },
        escrow_details: EscrowInfo {
            api_url: escrow_url.to_string(),
            secret_key: SecretString::from("sk_test_fake_escrow_key"),
            webhook_secret: SecretString::from(WEBHOOK_SECRET),
        },
        kyc_details: KycInfo {
            api_url: kyc_url.to_string(),
            enabled: false,
        },
        settlement: SettlementInfo {
            auto_release_grace_hours: 168,
            sweep_secret: SecretString::from(SWEEP_SECRET),
            sweep_interval_secs: 3600,
            release_timeout_secs: 5,
        },
        notify_url: None,
    }
}

/// Build the full application over an in-memory store.
pub fn spawn_app(config: AppConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone() as Arc<dyn BookingStore>, config)
        .expect("Failed to build test AppState");

    let app = packmule_api::app::create_router(state.clone());
    let server = TestServer::new(app).expect("Failed to start test server");

    TestApp {
        state,
        store,
        server,
    }
}

pub fn bearer(state: &AppState, user_id: Uuid) -> String {
    let token = SecurityConfig::create_token(state, &user_id.to_string())
        .expect("Failed to mint test token");
    format!("Bearer {}", token)
}

/// Sign a webhook body the way the processor would.
pub fn sign_webhook(body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}
