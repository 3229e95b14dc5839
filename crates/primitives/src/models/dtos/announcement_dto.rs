use crate::models::entities::enum_types::AnnouncementStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Capacity-ledger view of an announcement: how much weight is still
/// reservable given its non-terminal bookings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityResponse {
    pub announcement_id: Uuid,
    pub status: AnnouncementStatus,
    pub max_weight_kg: f64,
    pub booked_weight_kg: f64,
    pub available_weight_kg: f64,
}
