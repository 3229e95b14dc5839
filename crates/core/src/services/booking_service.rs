use crate::app_state::AppState;
use crate::repositories::Transition;
use crate::services::capacity_service::CapacityService;
use crate::services::notification_service::NotificationService;
use crate::services::pricing_service::PricingService;
use packmule_primitives::error::{ApiError, KycGap};
use packmule_primitives::models::dtos::booking_dto::{
    BookingLedgerResponse, BookingResponse, CancelBookingRequest, CreateBookingRequest,
    CreateBookingResponse, LedgerEntryDto, RefuseBookingRequest,
};
use packmule_primitives::models::entities::booking::{Booking, NewBooking};
use packmule_primitives::models::entities::enum_types::{
    BookingStatus, NotificationKind, VerificationStatus,
};
use tracing::info;
use uuid::Uuid;

pub struct BookingService;

impl BookingService {
    /// Create a booking in `pending`. Guards run in order: announcement
    /// exists and is bookable, requester is not the announcement owner, KYC
    /// gate (when enabled), pending-request cap, capacity pre-check. The
    /// store re-checks capacity atomically at insert time, so a race between
    /// two creates is settled there.
    pub async fn create_booking(
        state: &AppState,
        sender_id: Uuid,
        req: CreateBookingRequest,
    ) -> Result<CreateBookingResponse, ApiError> {
        let announcement = state
            .store
            .find_announcement(req.announcement_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Announcement not found".into()))?;

        if !announcement.is_bookable() {
            return Err(ApiError::InvalidState(format!(
                "Announcement is {} and cannot be booked",
                announcement.status
            )));
        }

        if announcement.traveler_id == sender_id {
            return Err(ApiError::Forbidden(
                "You cannot book your own announcement".into(),
            ));
        }

        if state.config.kyc_details.enabled {
            Self::check_kyc(state, sender_id).await?;
        }

        let pending = state.store.count_pending_for_sender(sender_id).await?;
        if pending >= state.config.max_pending_bookings {
            return Err(ApiError::LimitExceeded(format!(
                "You already have {} pending booking requests; wait for a traveler to respond",
                pending
            )));
        }

        let available = CapacityService::available_weight(state.store.as_ref(), &announcement).await?;
        if req.weight_kg > available {
            return Err(ApiError::CapacityExceeded {
                requested_kg: req.weight_kg,
                available_kg: available,
            });
        }

        let amounts = PricingService::compute_amounts(
            req.weight_kg,
            announcement.price_per_kg,
            req.declared_value,
            req.insurance_opted,
            &state.config.pricing,
        );

        let booking = state
            .store
            .create_booking(NewBooking {
                announcement_id: announcement.id,
                sender_id,
                traveler_id: announcement.traveler_id,
                weight_kg: req.weight_kg,
                description: req.description,
                declared_value: req.declared_value,
                insurance_opted: req.insurance_opted,
                transport_price: amounts.transport_price,
                commission_amount: amounts.commission_amount,
                insurance_premium: amounts.insurance_premium,
                total_amount: amounts.total_amount,
                currency: announcement.currency,
                status: BookingStatus::Pending,
            })
            .await?;

        info!(booking_id = %booking.id, announcement_id = %announcement.id, "Booking created");

        NotificationService::notify_parties(state, &booking, NotificationKind::BookingRequested)
            .await;

        Ok(CreateBookingResponse {
            booking_id: booking.id,
            status: booking.status,
            amounts,
            currency: booking.currency,
        })
    }

    pub async fn accept_booking(
        state: &AppState,
        traveler_id: Uuid,
        booking_id: Uuid,
    ) -> Result<BookingResponse, ApiError> {
        let booking = Self::fetch(state, booking_id).await?;

        if booking.traveler_id != traveler_id {
            return Err(ApiError::Forbidden(
                "Only the traveler can accept this booking".into(),
            ));
        }

        match state.store.mark_accepted(booking_id).await? {
            Transition::Applied(booking) => {
                info!(booking_id = %booking.id, "Booking accepted");
                NotificationService::notify_parties(
                    state,
                    &booking,
                    NotificationKind::BookingAccepted,
                )
                .await;
                Ok(booking.into())
            }
            Transition::InvalidState(status) => Err(ApiError::InvalidState(format!(
                "Cannot accept a {} booking",
                status
            ))),
            Transition::NotFound => Err(ApiError::NotFound("Booking not found".into())),
        }
    }

    pub async fn refuse_booking(
        state: &AppState,
        traveler_id: Uuid,
        booking_id: Uuid,
        req: RefuseBookingRequest,
    ) -> Result<BookingResponse, ApiError> {
        let booking = Self::fetch(state, booking_id).await?;

        if booking.traveler_id != traveler_id {
            return Err(ApiError::Forbidden(
                "Only the traveler can refuse this booking".into(),
            ));
        }

        match state.store.mark_refused(booking_id, &req.reason).await? {
            Transition::Applied(booking) => {
                info!(booking_id = %booking.id, "Booking refused");
                NotificationService::notify_parties(
                    state,
                    &booking,
                    NotificationKind::BookingRefused,
                )
                .await;
                Ok(booking.into())
            }
            Transition::InvalidState(status) => Err(ApiError::InvalidState(format!(
                "Cannot refuse a {} booking",
                status
            ))),
            Transition::NotFound => Err(ApiError::NotFound("Booking not found".into())),
        }
    }

    /// Senders can back out while the booking is pending or accepted but not
    /// yet paid; after capture the money path owns the lifecycle.
    pub async fn cancel_booking(
        state: &AppState,
        sender_id: Uuid,
        booking_id: Uuid,
        req: CancelBookingRequest,
    ) -> Result<BookingResponse, ApiError> {
        let booking = Self::fetch(state, booking_id).await?;

        if booking.sender_id != sender_id {
            return Err(ApiError::Forbidden(
                "Only the sender can cancel this booking".into(),
            ));
        }

        match state.store.mark_cancelled(booking_id, &req.reason).await? {
            Transition::Applied(booking) => {
                info!(booking_id = %booking.id, "Booking cancelled");
                NotificationService::notify_parties(
                    state,
                    &booking,
                    NotificationKind::BookingCancelled,
                )
                .await;
                Ok(booking.into())
            }
            Transition::InvalidState(status) => Err(ApiError::InvalidState(format!(
                "Cannot cancel a {} booking",
                status
            ))),
            Transition::NotFound => Err(ApiError::NotFound("Booking not found".into())),
        }
    }

    /// Handover scan by the traveler: `paid -> in_transit`.
    pub async fn mark_in_transit(
        state: &AppState,
        traveler_id: Uuid,
        booking_id: Uuid,
    ) -> Result<BookingResponse, ApiError> {
        let booking = Self::fetch(state, booking_id).await?;

        if booking.traveler_id != traveler_id {
            return Err(ApiError::Forbidden(
                "Only the traveler can record the handover".into(),
            ));
        }

        match state.store.mark_in_transit(booking_id).await? {
            Transition::Applied(booking) => {
                info!(booking_id = %booking.id, "Booking in transit");
                NotificationService::notify_parties(
                    state,
                    &booking,
                    NotificationKind::BookingInTransit,
                )
                .await;
                Ok(booking.into())
            }
            Transition::InvalidState(status) => Err(ApiError::InvalidState(format!(
                "Cannot start transit for a {} booking",
                status
            ))),
            Transition::NotFound => Err(ApiError::NotFound("Booking not found".into())),
        }
    }

    /// Delivery scan by the traveler: `in_transit -> delivered`. Starts the
    /// auto-release grace period.
    pub async fn mark_delivered(
        state: &AppState,
        traveler_id: Uuid,
        booking_id: Uuid,
    ) -> Result<BookingResponse, ApiError> {
        let booking = Self::fetch(state, booking_id).await?;

        if booking.traveler_id != traveler_id {
            return Err(ApiError::Forbidden(
                "Only the traveler can record the delivery".into(),
            ));
        }

        match state.store.mark_delivered(booking_id).await? {
            Transition::Applied(booking) => {
                info!(booking_id = %booking.id, "Booking delivered");
                NotificationService::notify_parties(
                    state,
                    &booking,
                    NotificationKind::BookingDelivered,
                )
                .await;
                Ok(booking.into())
            }
            Transition::InvalidState(status) => Err(ApiError::InvalidState(format!(
                "Cannot record delivery for a {} booking",
                status
            ))),
            Transition::NotFound => Err(ApiError::NotFound("Booking not found".into())),
        }
    }

    pub async fn get_booking(
        state: &AppState,
        user_id: Uuid,
        booking_id: Uuid,
    ) -> Result<BookingResponse, ApiError> {
        let booking = Self::fetch(state, booking_id).await?;

        if !booking.is_party(user_id) {
            return Err(ApiError::Forbidden(
                "You are not a party to this booking".into(),
            ));
        }

        Ok(booking.into())
    }

    pub async fn list_bookings(
        state: &AppState,
        user_id: Uuid,
    ) -> Result<Vec<BookingResponse>, ApiError> {
        let bookings = state.store.bookings_for_user(user_id).await?;
        Ok(bookings.into_iter().map(BookingResponse::from).collect())
    }

    /// Audit trail of financial events for a booking, visible to its parties.
    pub async fn booking_ledger(
        state: &AppState,
        user_id: Uuid,
        booking_id: Uuid,
    ) -> Result<BookingLedgerResponse, ApiError> {
        let booking = Self::fetch(state, booking_id).await?;

        if !booking.is_party(user_id) {
            return Err(ApiError::Forbidden(
                "You are not a party to this booking".into(),
            ));
        }

        let entries = state.store.ledger_for_booking(booking_id).await?;

        Ok(BookingLedgerResponse {
            booking_id,
            entries: entries.into_iter().map(LedgerEntryDto::from).collect(),
        })
    }

    async fn fetch(state: &AppState, booking_id: Uuid) -> Result<Booking, ApiError> {
        state
            .store
            .find_booking(booking_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Booking not found".into()))
    }

    async fn check_kyc(state: &AppState, user_id: Uuid) -> Result<(), ApiError> {
        let gap = match state.kyc.verification_status(user_id).await? {
            Some(VerificationStatus::Approved) => return Ok(()),
            Some(VerificationStatus::Pending) => KycGap::Pending,
            Some(VerificationStatus::Rejected) => KycGap::Rejected,
            Some(VerificationStatus::Incomplete) => KycGap::Incomplete,
            None => KycGap::NotStarted,
        };

        Err(ApiError::KycRequired(gap))
    }
}
