use axum::extract::{Extension, Path, State};
use axum::Json;
use packmule_core::services::payment_service::PaymentService;
use packmule_core::{AppState, Claims};
use packmule_primitives::error::{ApiError, ApiErrorResponse};
use packmule_primitives::models::dtos::booking_dto::InitiatePaymentResponse;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/bookings/{booking_id}/pay",
    params(("booking_id" = Uuid, Path, description = "Accepted booking to pay for")),
    responses(
        (status = 200, description = "Escrow hold created (or already present)", body = InitiatePaymentResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 403, description = "Caller is not the sender", body = ApiErrorResponse),
        (status = 404, description = "Booking not found", body = ApiErrorResponse),
        (status = 409, description = "Booking is not accepted", body = ApiErrorResponse),
        (status = 502, description = "Payment processor unavailable", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Payments"
)]
pub async fn initiate_payment(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<InitiatePaymentResponse>, ApiError> {
    let sender_id = claims.user_id()?;

    let response = PaymentService::initiate_payment(&state, sender_id, booking_id).await?;

    Ok(Json(response))
}
