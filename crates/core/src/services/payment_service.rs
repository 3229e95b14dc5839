use crate::app_state::AppState;
use crate::services::pricing_service::PricingService;
use packmule_primitives::error::ApiError;
use packmule_primitives::models::dtos::booking_dto::InitiatePaymentResponse;
use packmule_primitives::models::dtos::clients_dto::HoldMetadata;
use packmule_primitives::models::entities::enum_types::BookingStatus;
use tracing::info;
use uuid::Uuid;

pub struct PaymentService;

impl PaymentService {
    /// Create the escrow hold for an accepted booking. One hold per booking:
    /// a repeat request returns the stored reference instead of creating a
    /// second hold.
    pub async fn initiate_payment(
        state: &AppState,
        sender_id: Uuid,
        booking_id: Uuid,
    ) -> Result<InitiatePaymentResponse, ApiError> {
        let booking = state
            .store
            .find_booking(booking_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Booking not found".into()))?;

        if booking.sender_id != sender_id {
            return Err(ApiError::Forbidden(
                "Only the sender can pay for this booking".into(),
            ));
        }

        if booking.status != BookingStatus::Accepted {
            return Err(ApiError::InvalidState(format!(
                "Cannot pay for a {} booking",
                booking.status
            )));
        }

        let amount_minor = PricingService::to_minor_units(booking.total_amount);

        if let Some(existing) = booking.hold_reference {
            info!(booking_id = %booking.id, hold_reference = %existing, "Hold already exists");
            return Ok(InitiatePaymentResponse {
                booking_id: booking.id,
                hold_reference: existing,
                client_secret: None,
                amount_minor,
                currency: booking.currency,
                already_created: true,
            });
        }

        let hold = state
            .escrow
            .create_hold(
                amount_minor,
                booking.currency,
                &HoldMetadata {
                    booking_id: booking.id,
                    sender_id: booking.sender_id,
                    traveler_id: booking.traveler_id,
                },
            )
            .await?;

        state
            .store
            .set_hold_reference(booking.id, &hold.reference)
            .await?;

        info!(booking_id = %booking.id, hold_reference = %hold.reference, "Escrow hold created");

        Ok(InitiatePaymentResponse {
            booking_id: booking.id,
            hold_reference: hold.reference,
            client_secret: Some(hold.client_secret),
            amount_minor,
            currency: booking.currency,
            already_created: false,
        })
    }
}
