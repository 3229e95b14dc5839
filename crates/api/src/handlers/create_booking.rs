use axum::extract::{Extension, Json, State};
use http::StatusCode;
use packmule_core::services::booking_service::BookingService;
use packmule_core::Claims;
use packmule_primitives::error::{ApiError, ApiErrorResponse};
use packmule_primitives::models::dtos::booking_dto::{
    CreateBookingRequest, CreateBookingResponse,
};
use std::sync::Arc;
use tracing::error;
use validator::Validate;

use packmule_core::AppState;

#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = CreateBookingResponse),
        (status = 400, description = "Invalid input", body = ApiErrorResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 403, description = "Own announcement or KYC gate", body = ApiErrorResponse),
        (status = 404, description = "Announcement not found", body = ApiErrorResponse),
        (status = 422, description = "Capacity or pending cap exceeded", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Bookings"
)]
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), ApiError> {
    req.validate().map_err(|e| {
        error!("Validation error: {}", e);
        ApiError::Validation(e)
    })?;

    let sender_id = claims.user_id()?;

    let response = BookingService::create_booking(&state, sender_id, req).await?;

    Ok((StatusCode::CREATED, Json(response)))
}
