use packmule_primitives::error::ApiError;
use packmule_primitives::models::dtos::clients_dto::{
    CreateHoldRequest, CreateTransferRequest, EscrowApiResponse, EscrowHold, EscrowTransfer,
    HoldMetadata,
};
use packmule_primitives::models::entities::enum_types::CurrencyCode;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

/// Thin client for the external escrow processor. Amounts cross this
/// boundary in minor units only.
#[derive(Clone)]
pub struct EscrowClient {
    http: Client,
    base_url: Url,
    secret_key: SecretString,
}

impl EscrowClient {
    pub fn new(http: Client, base_url: &str, secret_key: SecretString) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|_| ApiError::Internal("Invalid escrow base URL".into()))?;

        Ok(Self {
            http,
            base_url,
            secret_key,
        })
    }

    /// Create a hold for the booking total. The metadata ties the hold back
    /// to the booking and both parties for webhook correlation.
    pub async fn create_hold(
        &self,
        amount_minor: i64,
        currency: CurrencyCode,
        metadata: &HoldMetadata,
    ) -> Result<EscrowHold, ApiError> {
        let url = self.endpoint("holds");

        let resp = self
            .http
            .post(url)
            .bearer_auth(self.secret_key.expose_secret())
            .json(&CreateHoldRequest {
                amount_minor,
                currency,
                metadata,
            })
            .send()
            .await
            .map_err(|e| ApiError::Processor(format!("create_hold request failed: {}", e)))?;

        let status = resp.status();

        let body: EscrowApiResponse<EscrowHold> = resp
            .json()
            .await
            .map_err(|e| ApiError::Processor(format!("create_hold invalid response: {}", e)))?;

        if !status.is_success() || !body.status {
            warn!(
                escrow_message = %body.message,
                http_status = status.as_u16(),
                "Escrow create_hold rejected"
            );
            return Err(ApiError::Processor(format!(
                "create_hold rejected: {}",
                body.message
            )));
        }

        body.data
            .ok_or(ApiError::Processor("create_hold response missing data".into()))
    }

    /// Move escrowed funds to a payout destination. Callers are responsible
    /// for idempotency; the reference passed here is their dedup key.
    pub async fn transfer(
        &self,
        destination_account: &str,
        amount_minor: i64,
        currency: CurrencyCode,
        reference: &str,
    ) -> Result<EscrowTransfer, ApiError> {
        let url = self.endpoint("transfers");

        let resp = self
            .http
            .post(url)
            .bearer_auth(self.secret_key.expose_secret())
            .json(&CreateTransferRequest {
                destination_account,
                amount_minor,
                currency,
                reference,
            })
            .send()
            .await
            .map_err(|e| ApiError::Processor(format!("transfer request failed: {}", e)))?;

        let status = resp.status();

        let body: EscrowApiResponse<EscrowTransfer> = resp
            .json()
            .await
            .map_err(|e| ApiError::Processor(format!("transfer invalid response: {}", e)))?;

        if !status.is_success() || !body.status {
            warn!(
                escrow_message = %body.message,
                http_status = status.as_u16(),
                "Escrow transfer rejected"
            );
            return Err(ApiError::Processor(format!(
                "transfer rejected: {}",
                body.message
            )));
        }

        body.data
            .ok_or(ApiError::Processor("transfer response missing data".into()))
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }
}
