use crate::models::entities::enum_types::CurrencyCode;
use eyre::Report;
use secrecy::SecretString;
use std::env;

#[derive(Debug, Clone)]
pub struct JwtInfo {
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub jwt_issuer: String,
    pub jwt_audience: String,
}

impl JwtInfo {
    pub fn new() -> Result<Self, Report> {
        Ok(Self {
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").map_err(|_| eyre::eyre!("JWT_SECRET must be set"))?,
            ),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".into())
                .parse()?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "packmule".into()),
            jwt_audience: env::var("JWT_AUDIENCE").unwrap_or_else(|_| "packmule_api".into()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct EscrowInfo {
    pub api_url: String,
    pub secret_key: SecretString,
    pub webhook_secret: SecretString,
}

impl EscrowInfo {
    pub fn new() -> Result<Self, Report> {
        Ok(Self {
            api_url: env::var("ESCROW_API_URL")
                .unwrap_or_else(|_| "https://api.escrow.example.com".into()),
            secret_key: SecretString::from(
                env::var("ESCROW_SECRET_KEY")
                    .map_err(|_| eyre::eyre!("ESCROW_SECRET_KEY must be set"))?,
            ),
            webhook_secret: SecretString::from(
                env::var("ESCROW_WEBHOOK_SECRET")
                    .map_err(|_| eyre::eyre!("ESCROW_WEBHOOK_SECRET must be set"))?,
            ),
        })
    }
}

#[derive(Debug, Clone)]
pub struct KycInfo {
    pub api_url: String,
    /// Feature flag for the identity-verification gate on booking creation.
    pub enabled: bool,
}

impl KycInfo {
    pub fn new() -> Result<Self, Report> {
        Ok(Self {
            api_url: env::var("KYC_API_URL")
                .unwrap_or_else(|_| "https://api.kyc.example.com".into()),
            enabled: env::var("KYC_GATE_ENABLED")
                .unwrap_or_else(|_| "true".into())
                .parse()?,
        })
    }
}

/// Commission and insurance rates. Passed explicitly into the pricing engine
/// so gated/ungated behaviour stays deterministic under test.
#[derive(Debug, Clone)]
pub struct PricingInfo {
    pub commission_rate: f64,
    pub insurance_rate: f64,
    pub insurance_base_fee: f64,
}

impl PricingInfo {
    pub fn new() -> Result<Self, Report> {
        Ok(Self {
            commission_rate: env::var("COMMISSION_RATE")
                .unwrap_or_else(|_| "0.12".into())
                .parse()?,
            insurance_rate: env::var("INSURANCE_RATE")
                .unwrap_or_else(|_| "0.03".into())
                .parse()?,
            insurance_base_fee: env::var("INSURANCE_BASE_FEE")
                .unwrap_or_else(|_| "0".into())
                .parse()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SettlementInfo {
    /// Grace period after delivery before the sweep releases funds. 7 days.
    pub auto_release_grace_hours: i64,
    pub sweep_secret: SecretString,
    pub sweep_interval_secs: u64,
    /// Per-booking budget inside a sweep; a slow release must not stall the batch.
    pub release_timeout_secs: u64,
}

impl SettlementInfo {
    pub fn new() -> Result<Self, Report> {
        Ok(Self {
            auto_release_grace_hours: env::var("AUTO_RELEASE_GRACE_HOURS")
                .unwrap_or_else(|_| "168".into())
                .parse()?,
            sweep_secret: SecretString::from(
                env::var("SWEEP_SECRET").map_err(|_| eyre::eyre!("SWEEP_SECRET must be set"))?,
            ),
            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| "3600".into())
                .parse()?,
            release_timeout_secs: env::var("RELEASE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_details: JwtInfo,

    pub app_url: String,

    pub currency: CurrencyCode,

    pub max_pending_bookings: i64,

    pub pricing: PricingInfo,

    pub escrow_details: EscrowInfo,

    pub kyc_details: KycInfo,

    pub settlement: SettlementInfo,

    /// Notification sink base URL; unset disables outbound notifications.
    pub notify_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Report> {
        Ok(Self {
            jwt_details: JwtInfo::new()?,

            app_url: env::var("APP_URL").unwrap_or_else(|_| "http://localhost:8080".into()),

            currency: CurrencyCode::parse(
                &env::var("CURRENCY").unwrap_or_else(|_| "EUR".into()),
            )
            .map_err(|e| eyre::eyre!("{e}"))?,

            max_pending_bookings: env::var("MAX_PENDING_BOOKINGS")
                .unwrap_or_else(|_| "5".into())
                .parse()?,

            pricing: PricingInfo::new()?,

            escrow_details: EscrowInfo::new()?,

            kyc_details: KycInfo::new()?,

            settlement: SettlementInfo::new()?,

            notify_url: env::var("NOTIFY_API_URL").ok(),
        })
    }
}
