use crate::app_state::AppState;
use crate::repositories::ReleaseClaim;
use crate::services::notification_service::NotificationService;
use crate::services::pricing_service::PricingService;
use chrono::{Duration, Utc};
use packmule_primitives::error::ApiError;
use packmule_primitives::models::dtos::booking_dto::ConfirmDeliveryResponse;
use packmule_primitives::models::dtos::settlement_dto::SweepReport;
use packmule_primitives::models::entities::enum_types::{
    EntryOutcome, LedgerEntryKind, NotificationKind, ReleaseTrigger,
};
use packmule_primitives::models::entities::ledger_entry::NewLedgerEntry;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug)]
pub struct ReleaseOutcome {
    pub released: bool,
    pub already_released: bool,
    pub transfer_reference: Option<String>,
}

pub struct SettlementService;

impl SettlementService {
    /// Move escrowed funds to the traveler, at most once per booking. The
    /// claim is the dedup point: a caller that loses the race observes
    /// `already_released` and performs no transfer, regardless of which
    /// trigger it came in with. No lock is held across the transfer call.
    pub async fn release_funds(
        state: &AppState,
        booking_id: Uuid,
        trigger: ReleaseTrigger,
    ) -> Result<ReleaseOutcome, ApiError> {
        let booking = match state.store.claim_release(booking_id).await? {
            ReleaseClaim::Claimed(booking) => booking,
            ReleaseClaim::AlreadyReleased | ReleaseClaim::InProgress => {
                return Ok(ReleaseOutcome {
                    released: false,
                    already_released: true,
                    transfer_reference: None,
                });
            }
            ReleaseClaim::NotEligible(status) => {
                return Err(ApiError::InvalidState(format!(
                    "Cannot release funds for a {} booking",
                    status
                )));
            }
            ReleaseClaim::NotFound => {
                return Err(ApiError::NotFound("Booking not found".into()));
            }
        };

        // The traveler is paid the transport price; commission and insurance
        // premium stay with the platform.
        let payout_minor = PricingService::to_minor_units(booking.transport_price);
        let reference = format!("release-{}", booking.id);

        let transfer = match state
            .escrow
            .transfer(
                &booking.traveler_id.to_string(),
                payout_minor,
                booking.currency,
                &reference,
            )
            .await
        {
            Ok(transfer) => transfer,
            Err(e) => {
                // Drop the claim so a later confirmation or sweep can retry.
                state.store.abort_release(booking_id).await?;
                return Err(e);
            }
        };

        state
            .store
            .finish_release(
                booking_id,
                trigger,
                &transfer.transfer_id,
                NewLedgerEntry {
                    booking_id,
                    entry_kind: LedgerEntryKind::Transfer,
                    amount_minor: payout_minor,
                    currency: booking.currency,
                    provider_reference: Some(transfer.transfer_id.clone()),
                    outcome: EntryOutcome::Succeeded,
                    detail: None,
                },
            )
            .await?;

        info!(
            booking_id = %booking_id,
            %trigger,
            transfer_id = %transfer.transfer_id,
            "Funds released to traveler"
        );

        if let Some(released) = state.store.find_booking(booking_id).await? {
            NotificationService::notify_parties(state, &released, NotificationKind::FundsReleased)
                .await;
        }

        Ok(ReleaseOutcome {
            released: true,
            already_released: false,
            transfer_reference: Some(transfer.transfer_id),
        })
    }

    /// Sender confirms receipt; fires the release synchronously.
    pub async fn confirm_delivery(
        state: &AppState,
        sender_id: Uuid,
        booking_id: Uuid,
    ) -> Result<ConfirmDeliveryResponse, ApiError> {
        let booking = state
            .store
            .find_booking(booking_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Booking not found".into()))?;

        if booking.sender_id != sender_id {
            return Err(ApiError::Forbidden(
                "Only the sender can confirm delivery".into(),
            ));
        }

        let outcome =
            Self::release_funds(state, booking_id, ReleaseTrigger::Confirmation).await?;

        Ok(ConfirmDeliveryResponse {
            booking_id,
            released: outcome.released,
            already_released: outcome.already_released,
            transfer_reference: outcome.transfer_reference,
        })
    }

    /// Release every delivered booking past the grace period. Items are
    /// processed independently: one slow or failing release is timed out or
    /// recorded and the sweep moves on.
    pub async fn run_release_sweep(state: &AppState) -> Result<SweepReport, ApiError> {
        let cutoff =
            Utc::now() - Duration::hours(state.config.settlement.auto_release_grace_hours);
        let due = state.store.due_for_auto_release(cutoff).await?;

        let mut released = 0usize;
        let mut errors = Vec::new();
        let budget =
            std::time::Duration::from_secs(state.config.settlement.release_timeout_secs);

        for booking in &due {
            let attempt = tokio::time::timeout(
                budget,
                Self::release_funds(state, booking.id, ReleaseTrigger::AutoRelease),
            )
            .await;

            match attempt {
                Ok(Ok(outcome)) if outcome.released => released += 1,
                Ok(Ok(_)) => {
                    // someone else released it between the select and the claim
                    info!(booking_id = %booking.id, "Sweep skipped booking already released");
                }
                Ok(Err(e)) => {
                    error!(booking_id = %booking.id, error = %e, "Sweep release failed");
                    errors.push(format!("{}: release failed", booking.id));
                }
                Err(_) => {
                    warn!(booking_id = %booking.id, "Sweep release timed out");
                    errors.push(format!("{}: release timed out", booking.id));
                }
            }
        }

        let report = SweepReport {
            processed: due.len(),
            released,
            errors,
        };

        info!(
            processed = report.processed,
            released = report.released,
            failed = report.errors.len(),
            "Auto-release sweep finished"
        );

        Ok(report)
    }
}
