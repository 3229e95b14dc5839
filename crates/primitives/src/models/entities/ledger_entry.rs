use crate::models::entities::enum_types::{CurrencyCode, EntryOutcome, LedgerEntryKind};
use chrono::{DateTime, Utc};
use diesel::{Associations, Identifiable, Insertable, Queryable};
use serde::Serialize;
use uuid::Uuid;

/// Append-only record of a financial event against a booking. Created only
/// by the payment adapter and the settlement engine, never mutated.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Insertable, Serialize)]
#[diesel(table_name = crate::schema::ledger_entries)]
#[diesel(belongs_to(crate::models::entities::booking::Booking))]
pub struct LedgerEntry {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub entry_kind: LedgerEntryKind,
    pub amount_minor: i64,
    pub currency: CurrencyCode,
    pub provider_reference: Option<String>,
    pub outcome: EntryOutcome,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::ledger_entries)]
pub struct NewLedgerEntry {
    pub booking_id: Uuid,
    pub entry_kind: LedgerEntryKind,
    pub amount_minor: i64,
    pub currency: CurrencyCode,
    pub provider_reference: Option<String>,
    pub outcome: EntryOutcome,
    pub detail: Option<String>,
}

impl NewLedgerEntry {
    pub fn into_entry(self) -> LedgerEntry {
        LedgerEntry {
            id: Uuid::new_v4(),
            booking_id: self.booking_id,
            entry_kind: self.entry_kind,
            amount_minor: self.amount_minor,
            currency: self.currency,
            provider_reference: self.provider_reference,
            outcome: self.outcome,
            detail: self.detail,
            created_at: Utc::now(),
        }
    }
}
