use packmule_primitives::error::ApiError;
use packmule_primitives::models::dtos::clients_dto::VerificationStatusResponse;
use packmule_primitives::models::entities::enum_types::VerificationStatus;
use reqwest::{Client, StatusCode, Url};
use uuid::Uuid;

/// Read-only client for the external identity-verification provider.
#[derive(Clone)]
pub struct KycClient {
    http: Client,
    base_url: Url,
}

impl KycClient {
    pub fn new(http: Client, base_url: &str) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|_| ApiError::Internal("Invalid KYC base URL".into()))?;

        Ok(Self { http, base_url })
    }

    /// `None` means the user never started verification.
    pub async fn verification_status(
        &self,
        user_id: Uuid,
    ) -> Result<Option<VerificationStatus>, ApiError> {
        let mut url = self.base_url.clone();
        url.set_path(&format!("verifications/{}", user_id));

        let resp = self.http.get(url).send().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to reach verification provider");
            ApiError::Internal("Verification service unavailable".into())
        })?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !resp.status().is_success() {
            tracing::warn!(
                http_status = resp.status().as_u16(),
                "Verification provider returned an error"
            );
            return Err(ApiError::Internal("Verification service unavailable".into()));
        }

        let body: VerificationStatusResponse = resp
            .json()
            .await
            .map_err(|_| ApiError::Internal("Invalid verification response".into()))?;

        Ok(Some(body.status))
    }
}
