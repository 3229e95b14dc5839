use crate::error::ApiError;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, EnumString, ToSchema,
)]
#[ExistingTypePath = "crate::schema::sql_types::CurrencyCode"]
#[strum(serialize_all = "UPPERCASE")]
pub enum CurrencyCode {
    EUR,
    USD,
    GBP,
    CHF,
    CAD,
}

impl CurrencyCode {
    pub fn parse(input: &str) -> Result<Self, ApiError> {
        let normalized = input.trim().to_uppercase();

        CurrencyCode::from_str(&normalized)
            .map_err(|_| ApiError::BadRequest(format!("Unsupported currency: {}", input)))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, ToSchema,
)]
#[ExistingTypePath = "crate::schema::sql_types::AnnouncementStatus"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnnouncementStatus {
    Draft,
    Active,
    Completed,
    Cancelled,
}

/// Canonical booking lifecycle status. Transitions between these values only
/// happen through the store's compare-and-set methods.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, ToSchema,
)]
#[ExistingTypePath = "crate::schema::sql_types::BookingStatus"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Refused,
    Cancelled,
    Paid,
    InTransit,
    Delivered,
    Released,
}

impl BookingStatus {
    /// Statuses that reserve weight on the announcement.
    pub const CAPACITY_HOLDERS: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Accepted,
        BookingStatus::Paid,
        BookingStatus::InTransit,
    ];

    pub fn counts_against_capacity(self) -> bool {
        Self::CAPACITY_HOLDERS.contains(&self)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BookingStatus::Refused | BookingStatus::Cancelled | BookingStatus::Released
        )
    }
}

/// What caused an escrow release: an explicit delivery confirmation by the
/// sender, or the grace-period sweep.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, ToSchema,
)]
#[ExistingTypePath = "crate::schema::sql_types::ReleaseTrigger"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReleaseTrigger {
    Confirmation,
    AutoRelease,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, ToSchema,
)]
#[ExistingTypePath = "crate::schema::sql_types::LedgerEntryKind"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LedgerEntryKind {
    Capture,
    Refund,
    Transfer,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, ToSchema,
)]
#[ExistingTypePath = "crate::schema::sql_types::EntryOutcome"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntryOutcome {
    Succeeded,
    Failed,
}

/// Verification state reported by the external identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VerificationStatus {
    Approved,
    Pending,
    Rejected,
    Incomplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
    BookingRequested,
    BookingAccepted,
    BookingRefused,
    BookingCancelled,
    PaymentCaptured,
    PaymentFailed,
    BookingInTransit,
    BookingDelivered,
    FundsReleased,
}
