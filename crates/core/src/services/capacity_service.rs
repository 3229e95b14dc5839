use crate::repositories::BookingStore;
use packmule_primitives::error::ApiError;
use packmule_primitives::models::dtos::announcement_dto::AvailabilityResponse;
use packmule_primitives::models::entities::announcement::Announcement;
use uuid::Uuid;

pub struct CapacityService;

impl CapacityService {
    /// Remaining reservable weight on an announcement, derived from its
    /// non-terminal bookings. This read is best-effort under concurrency;
    /// the store re-checks under a lock when a booking is actually inserted.
    pub async fn available_weight(
        store: &dyn BookingStore,
        announcement: &Announcement,
    ) -> Result<f64, ApiError> {
        let booked = store.booked_weight(announcement.id).await?;
        Ok(announcement.max_weight_kg - booked)
    }

    pub async fn availability(
        store: &dyn BookingStore,
        announcement_id: Uuid,
    ) -> Result<AvailabilityResponse, ApiError> {
        let announcement = store
            .find_announcement(announcement_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Announcement not found".into()))?;

        let booked = store.booked_weight(announcement_id).await?;

        Ok(AvailabilityResponse {
            announcement_id,
            status: announcement.status,
            max_weight_kg: announcement.max_weight_kg,
            booked_weight_kg: booked,
            available_weight_kg: announcement.max_weight_kg - booked,
        })
    }
}
