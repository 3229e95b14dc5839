use axum::extract::{Extension, Path, State};
use axum::Json;
use packmule_core::services::booking_service::BookingService;
use packmule_core::{AppState, Claims};
use packmule_primitives::error::{ApiError, ApiErrorResponse};
use packmule_primitives::models::dtos::booking_dto::BookingResponse;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/bookings/{booking_id}/accept",
    params(("booking_id" = Uuid, Path, description = "Booking to accept")),
    responses(
        (status = 200, description = "Booking accepted", body = BookingResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 403, description = "Caller is not the traveler", body = ApiErrorResponse),
        (status = 404, description = "Booking not found", body = ApiErrorResponse),
        (status = 409, description = "Booking is not pending", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Bookings"
)]
pub async fn accept_booking(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let traveler_id = claims.user_id()?;

    let response = BookingService::accept_booking(&state, traveler_id, booking_id).await?;

    Ok(Json(response))
}
