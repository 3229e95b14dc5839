use axum::extract::{Extension, Path, State};
use axum::Json;
use packmule_core::services::booking_service::BookingService;
use packmule_core::{AppState, Claims};
use packmule_primitives::error::{ApiError, ApiErrorResponse};
use packmule_primitives::models::dtos::booking_dto::{BookingResponse, RefuseBookingRequest};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/bookings/{booking_id}/refuse",
    params(("booking_id" = Uuid, Path, description = "Booking to refuse")),
    request_body = RefuseBookingRequest,
    responses(
        (status = 200, description = "Booking refused", body = BookingResponse),
        (status = 400, description = "Missing refusal reason", body = ApiErrorResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 403, description = "Caller is not the traveler", body = ApiErrorResponse),
        (status = 404, description = "Booking not found", body = ApiErrorResponse),
        (status = 409, description = "Booking is not pending", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Bookings"
)]
pub async fn refuse_booking(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<RefuseBookingRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    req.validate().map_err(ApiError::Validation)?;

    let traveler_id = claims.user_id()?;

    let response = BookingService::refuse_booking(&state, traveler_id, booking_id, req).await?;

    Ok(Json(response))
}
