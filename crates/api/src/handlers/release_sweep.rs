use axum::extract::State;
use axum::Json;
use http::HeaderMap;
use packmule_core::services::settlement_service::SettlementService;
use packmule_core::AppState;
use packmule_primitives::error::{ApiError, ApiErrorResponse, AuthError};
use packmule_primitives::models::dtos::settlement_dto::SweepReport;
use secrecy::ExposeSecret;
use std::sync::Arc;
use subtle::ConstantTimeEq;

#[utoipa::path(
    post,
    path = "/api/internal/release_sweep",
    responses(
        (status = 200, description = "Sweep report", body = SweepReport),
        (status = 401, description = "Missing or wrong sweep secret", body = ApiErrorResponse)
    ),
    security(()),
    tag = "Settlement"
)]
pub async fn release_sweep(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SweepReport>, ApiError> {
    let provided = headers
        .get("x-sweep-secret")
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Auth(AuthError::MissingHeader))?;

    let expected = state.config.settlement.sweep_secret.expose_secret();
    if provided.as_bytes().ct_eq(expected.as_bytes()).unwrap_u8() != 1 {
        return Err(ApiError::Auth(AuthError::InvalidToken(
            "Invalid sweep secret".into(),
        )));
    }

    let report = SettlementService::run_release_sweep(&state).await?;

    Ok(Json(report))
}
