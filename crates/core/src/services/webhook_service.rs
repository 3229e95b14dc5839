use crate::app_state::AppState;
use crate::repositories::{CaptureOutcome, RefundOutcome};
use crate::services::notification_service::NotificationService;
use packmule_primitives::error::ApiError;
use packmule_primitives::models::dtos::clients_dto::{
    EscrowEventData, EscrowEventKind, EscrowWebhook,
};
use packmule_primitives::models::entities::enum_types::{
    EntryOutcome, LedgerEntryKind, NotificationKind,
};
use packmule_primitives::models::entities::ledger_entry::NewLedgerEntry;
use tracing::{info, warn};

pub enum WebhookOutcome {
    Processed,
    Ignored,
}

pub struct WebhookService;

impl WebhookService {
    /// Constant-time HMAC-SHA256 check over the raw body. Runs before any
    /// parsing or dispatch.
    pub fn verify_signature(
        secret: &str,
        payload: &[u8],
        actual_signature: &str,
    ) -> Result<(), ApiError> {
        use hmac::{Hmac, Mac};
        use sha2::Sha256;
        use subtle::ConstantTimeEq;

        type HmacSha256 = Hmac<Sha256>;

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| ApiError::Internal("Invalid webhook secret".into()))?;

        mac.update(payload);
        let expected = hex::encode(mac.finalize().into_bytes());

        if expected
            .as_bytes()
            .ct_eq(actual_signature.as_bytes())
            .unwrap_u8()
            != 1
        {
            return Err(ApiError::Webhook("Invalid escrow signature".into()));
        }

        Ok(())
    }

    pub fn parse_event(body: &[u8]) -> Result<EscrowWebhook, ApiError> {
        serde_json::from_slice(body)
            .map_err(|_| ApiError::Webhook("Invalid webhook payload".into()))
    }

    /// Dispatch a verified processor event. Deliveries are at-least-once and
    /// possibly out of order, so every arm must be idempotent per booking.
    pub async fn handle_event(
        state: &AppState,
        payload: EscrowWebhook,
    ) -> Result<WebhookOutcome, ApiError> {
        match payload.event {
            EscrowEventKind::HoldCaptured => Self::handle_captured(state, payload.data).await,
            EscrowEventKind::HoldCaptureFailed => {
                Self::handle_capture_failed(state, payload.data).await
            }
            EscrowEventKind::HoldRefunded => Self::handle_refunded(state, payload.data).await,
            EscrowEventKind::Unknown => {
                info!("Ignoring unknown escrow event kind");
                Ok(WebhookOutcome::Ignored)
            }
        }
    }

    async fn handle_captured(
        state: &AppState,
        data: EscrowEventData,
    ) -> Result<WebhookOutcome, ApiError> {
        let entry = NewLedgerEntry {
            booking_id: data.booking_id,
            entry_kind: LedgerEntryKind::Capture,
            amount_minor: data.amount_minor,
            currency: data.currency.unwrap_or(state.config.currency),
            provider_reference: Some(data.reference.clone()),
            outcome: EntryOutcome::Succeeded,
            detail: None,
        };

        match state
            .store
            .record_capture(data.booking_id, &data.reference, entry)
            .await?
        {
            CaptureOutcome::Applied(booking) => {
                info!(booking_id = %booking.id, "Payment captured, booking paid");
                NotificationService::notify_parties(
                    state,
                    &booking,
                    NotificationKind::PaymentCaptured,
                )
                .await;
                Ok(WebhookOutcome::Processed)
            }
            CaptureOutcome::AlreadyPaid => {
                info!(booking_id = %data.booking_id, "Duplicate capture event, already paid");
                Ok(WebhookOutcome::Processed)
            }
            CaptureOutcome::InvalidState(status) => {
                // Redelivery cannot fix this; acknowledge and keep the log.
                warn!(
                    booking_id = %data.booking_id,
                    %status,
                    "Capture event for a booking not awaiting payment"
                );
                Ok(WebhookOutcome::Ignored)
            }
            CaptureOutcome::NotFound => {
                warn!(booking_id = %data.booking_id, "Capture event for unknown booking");
                Ok(WebhookOutcome::Ignored)
            }
        }
    }

    /// A failed capture leaves the booking `accepted`; payment can be
    /// retried. Each delivery appends its own failed entry as the audit
    /// trail of attempts.
    async fn handle_capture_failed(
        state: &AppState,
        data: EscrowEventData,
    ) -> Result<WebhookOutcome, ApiError> {
        let Some(booking) = state.store.find_booking(data.booking_id).await? else {
            warn!(booking_id = %data.booking_id, "Capture-failed event for unknown booking");
            return Ok(WebhookOutcome::Ignored);
        };

        state
            .store
            .append_ledger_entry(NewLedgerEntry {
                booking_id: booking.id,
                entry_kind: LedgerEntryKind::Capture,
                amount_minor: data.amount_minor,
                currency: data.currency.unwrap_or(state.config.currency),
                provider_reference: Some(data.reference),
                outcome: EntryOutcome::Failed,
                detail: data.reason,
            })
            .await?;

        info!(booking_id = %booking.id, "Capture failed, booking stays accepted");
        NotificationService::notify_parties(state, &booking, NotificationKind::PaymentFailed)
            .await;

        Ok(WebhookOutcome::Processed)
    }

    async fn handle_refunded(
        state: &AppState,
        data: EscrowEventData,
    ) -> Result<WebhookOutcome, ApiError> {
        let entry = NewLedgerEntry {
            booking_id: data.booking_id,
            entry_kind: LedgerEntryKind::Refund,
            amount_minor: data.amount_minor,
            currency: data.currency.unwrap_or(state.config.currency),
            provider_reference: Some(data.reference),
            outcome: EntryOutcome::Succeeded,
            detail: data.reason,
        };

        match state.store.record_refund(data.booking_id, entry).await? {
            RefundOutcome::Applied(booking) => {
                info!(booking_id = %booking.id, "Refund recorded, booking cancelled");
                NotificationService::notify_parties(
                    state,
                    &booking,
                    NotificationKind::BookingCancelled,
                )
                .await;
                Ok(WebhookOutcome::Processed)
            }
            RefundOutcome::AlreadyCancelled => {
                info!(booking_id = %data.booking_id, "Duplicate refund event, already cancelled");
                Ok(WebhookOutcome::Processed)
            }
            RefundOutcome::InvalidState(status) => {
                warn!(
                    booking_id = %data.booking_id,
                    %status,
                    "Refund event for a booking without captured funds"
                );
                Ok(WebhookOutcome::Ignored)
            }
            RefundOutcome::NotFound => {
                warn!(booking_id = %data.booking_id, "Refund event for unknown booking");
                Ok(WebhookOutcome::Ignored)
            }
        }
    }
}
