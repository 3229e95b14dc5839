use axum::extract::{Extension, Path, State};
use axum::Json;
use packmule_core::services::booking_service::BookingService;
use packmule_core::{AppState, Claims};
use packmule_primitives::error::{ApiError, ApiErrorResponse};
use packmule_primitives::models::dtos::booking_dto::BookingLedgerResponse;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/bookings/{booking_id}/ledger",
    params(("booking_id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Financial events recorded for the booking", body = BookingLedgerResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 403, description = "Caller is not a party", body = ApiErrorResponse),
        (status = 404, description = "Booking not found", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Settlement"
)]
pub async fn booking_ledger(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingLedgerResponse>, ApiError> {
    let user_id = claims.user_id()?;

    let response = BookingService::booking_ledger(&state, user_id, booking_id).await?;

    Ok(Json(response))
}
