use axum::extract::{Extension, Path, State};
use axum::Json;
use packmule_core::services::settlement_service::SettlementService;
use packmule_core::{AppState, Claims};
use packmule_primitives::error::{ApiError, ApiErrorResponse};
use packmule_primitives::models::dtos::booking_dto::ConfirmDeliveryResponse;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/bookings/{booking_id}/confirm",
    params(("booking_id" = Uuid, Path, description = "Delivered booking to confirm")),
    responses(
        (status = 200, description = "Funds released (or already released)", body = ConfirmDeliveryResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 403, description = "Caller is not the sender", body = ApiErrorResponse),
        (status = 404, description = "Booking not found", body = ApiErrorResponse),
        (status = 409, description = "Booking is not delivered", body = ApiErrorResponse),
        (status = 502, description = "Payment processor unavailable", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Settlement"
)]
pub async fn confirm_delivery(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<ConfirmDeliveryResponse>, ApiError> {
    let sender_id = claims.user_id()?;

    let response = SettlementService::confirm_delivery(&state, sender_id, booking_id).await?;

    Ok(Json(response))
}
