use crate::models::entities::booking::Booking;
use crate::models::entities::enum_types::{BookingStatus, CurrencyCode, ReleaseTrigger};
use crate::models::entities::ledger_entry::LedgerEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Booking creation ---

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateBookingRequest {
    pub announcement_id: Uuid,
    #[validate(range(min = 0.1, max = 100.0))]
    pub weight_kg: f64,
    #[validate(range(min = 0.0, max = 100_000.0))]
    pub declared_value: f64,
    pub insurance_opted: bool,
    #[validate(length(min = 1, max = 500))]
    pub description: String,
}

/// Quote computed at creation time; `total_amount` is always the sum of the
/// three components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Amounts {
    pub transport_price: f64,
    pub commission_amount: f64,
    pub insurance_premium: f64,
    pub total_amount: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateBookingResponse {
    pub booking_id: Uuid,
    pub status: BookingStatus,
    pub amounts: Amounts,
    pub currency: CurrencyCode,
}

// --- Party transitions ---

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct RefuseBookingRequest {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct CancelBookingRequest {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

// --- Payment ---

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InitiatePaymentResponse {
    pub booking_id: Uuid,
    pub hold_reference: String,
    /// Present only when the hold was created by this request; repeat calls
    /// return the stored reference without a fresh secret.
    pub client_secret: Option<String>,
    pub amount_minor: i64,
    pub currency: CurrencyCode,
    pub already_created: bool,
}

// --- Settlement ---

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfirmDeliveryResponse {
    pub booking_id: Uuid,
    pub released: bool,
    pub already_released: bool,
    pub transfer_reference: Option<String>,
}

// --- Views ---

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingResponse {
    pub id: Uuid,
    pub announcement_id: Uuid,
    pub sender_id: Uuid,
    pub traveler_id: Uuid,
    pub weight_kg: f64,
    pub description: String,
    pub declared_value: f64,
    pub insurance_opted: bool,
    pub amounts: Amounts,
    pub currency: CurrencyCode,
    pub status: BookingStatus,
    pub hold_reference: Option<String>,
    pub transfer_reference: Option<String>,
    pub refusal_reason: Option<String>,
    pub cancellation_reason: Option<String>,
    pub release_trigger: Option<ReleaseTrigger>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub refused_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub in_transit_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub delivery_confirmed_at: Option<DateTime<Utc>>,
    pub released_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            announcement_id: b.announcement_id,
            sender_id: b.sender_id,
            traveler_id: b.traveler_id,
            weight_kg: b.weight_kg,
            description: b.description,
            declared_value: b.declared_value,
            insurance_opted: b.insurance_opted,
            amounts: Amounts {
                transport_price: b.transport_price,
                commission_amount: b.commission_amount,
                insurance_premium: b.insurance_premium,
                total_amount: b.total_amount,
            },
            currency: b.currency,
            status: b.status,
            hold_reference: b.hold_reference,
            transfer_reference: b.transfer_reference,
            refusal_reason: b.refusal_reason,
            cancellation_reason: b.cancellation_reason,
            release_trigger: b.release_trigger,
            accepted_at: b.accepted_at,
            refused_at: b.refused_at,
            cancelled_at: b.cancelled_at,
            paid_at: b.paid_at,
            in_transit_at: b.in_transit_at,
            delivered_at: b.delivered_at,
            delivery_confirmed_at: b.delivery_confirmed_at,
            released_at: b.released_at,
            created_at: b.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingListResponse {
    pub bookings: Vec<BookingResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LedgerEntryDto {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub entry_kind: crate::models::entities::enum_types::LedgerEntryKind,
    pub amount_minor: i64,
    pub currency: CurrencyCode,
    pub provider_reference: Option<String>,
    pub outcome: crate::models::entities::enum_types::EntryOutcome,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<LedgerEntry> for LedgerEntryDto {
    fn from(e: LedgerEntry) -> Self {
        Self {
            id: e.id,
            booking_id: e.booking_id,
            entry_kind: e.entry_kind,
            amount_minor: e.amount_minor,
            currency: e.currency,
            provider_reference: e.provider_reference,
            outcome: e.outcome,
            detail: e.detail,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingLedgerResponse {
    pub booking_id: Uuid,
    pub entries: Vec<LedgerEntryDto>,
}
