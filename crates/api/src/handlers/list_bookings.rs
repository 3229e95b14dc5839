use axum::extract::{Extension, State};
use axum::Json;
use packmule_core::services::booking_service::BookingService;
use packmule_core::{AppState, Claims};
use packmule_primitives::error::{ApiError, ApiErrorResponse};
use packmule_primitives::models::dtos::booking_dto::BookingListResponse;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/bookings",
    responses(
        (status = 200, description = "Bookings where the caller is sender or traveler", body = BookingListResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Bookings"
)]
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<BookingListResponse>, ApiError> {
    let user_id = claims.user_id()?;

    let bookings = BookingService::list_bookings(&state, user_id).await?;

    Ok(Json(BookingListResponse { bookings }))
}
