use axum::extract::{Path, State};
use axum::Json;
use packmule_core::services::capacity_service::CapacityService;
use packmule_core::AppState;
use packmule_primitives::error::{ApiError, ApiErrorResponse};
use packmule_primitives::models::dtos::announcement_dto::AvailabilityResponse;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/announcements/{announcement_id}/availability",
    params(("announcement_id" = Uuid, Path, description = "Announcement id")),
    responses(
        (status = 200, description = "Remaining reservable weight", body = AvailabilityResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 404, description = "Announcement not found", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Announcements"
)]
pub async fn announcement_availability(
    State(state): State<Arc<AppState>>,
    Path(announcement_id): Path<Uuid>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let response = CapacityService::availability(state.store.as_ref(), announcement_id).await?;

    Ok(Json(response))
}
