use crate::models::entities::enum_types::CurrencyCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// --- Escrow API (outbound) ---

/// Response envelope shared by every escrow API endpoint.
#[derive(Debug, Deserialize)]
pub struct EscrowApiResponse<T> {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// Correlation metadata attached to a hold so webhook events can be matched
/// back to the booking and both parties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldMetadata {
    pub booking_id: Uuid,
    pub sender_id: Uuid,
    pub traveler_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CreateHoldRequest<'a> {
    pub amount_minor: i64,
    pub currency: CurrencyCode,
    pub metadata: &'a HoldMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EscrowHold {
    pub reference: String,
    pub client_secret: String,
}

#[derive(Debug, Serialize)]
pub struct CreateTransferRequest<'a> {
    pub destination_account: &'a str,
    pub amount_minor: i64,
    pub currency: CurrencyCode,
    pub reference: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EscrowTransfer {
    pub transfer_id: String,
}

// --- Escrow webhook (inbound) ---

/// Event kinds the processor delivers. Kinds added by the processor later
/// deserialise to `Unknown` and are acknowledged without processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum EscrowEventKind {
    #[serde(rename = "hold.captured")]
    HoldCaptured,
    #[serde(rename = "hold.capture_failed")]
    HoldCaptureFailed,
    #[serde(rename = "hold.refunded")]
    HoldRefunded,
    Unknown,
}

impl<'de> serde::Deserialize<'de> for EscrowEventKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "hold.captured" => EscrowEventKind::HoldCaptured,
            "hold.capture_failed" => EscrowEventKind::HoldCaptureFailed,
            "hold.refunded" => EscrowEventKind::HoldRefunded,
            _ => EscrowEventKind::Unknown,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EscrowEventData {
    pub booking_id: Uuid,
    pub amount_minor: i64,
    pub currency: Option<CurrencyCode>,
    /// Processor-side reference for the hold/transfer this event concerns.
    pub reference: String,
    pub reason: Option<String>,
}

/// Deliveries are at-least-once and possibly out of order; handling must be
/// idempotent per booking.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EscrowWebhook {
    pub event: EscrowEventKind,
    pub data: EscrowEventData,
}

// --- Notification sink ---

#[derive(Debug, Serialize)]
pub struct NotificationRequest<'a> {
    pub user_id: Uuid,
    pub kind: crate::models::entities::enum_types::NotificationKind,
    pub title: &'a str,
    pub body: &'a str,
    pub booking_id: Uuid,
}

// --- KYC provider ---

#[derive(Debug, Deserialize)]
pub struct VerificationStatusResponse {
    pub status: crate::models::entities::enum_types::VerificationStatus,
}
