use crate::models::entities::enum_types::{BookingStatus, CurrencyCode, ReleaseTrigger};
use chrono::{DateTime, Utc};
use diesel::{Associations, Identifiable, Insertable, Queryable};
use serde::Serialize;
use uuid::Uuid;

/// The central lifecycle record: one row per shipment request, never deleted.
/// Money amounts are the quote computed at creation time; the invariant
/// `total_amount == transport_price + commission_amount + insurance_premium`
/// holds from the insert onwards.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Insertable, Serialize)]
#[diesel(table_name = crate::schema::bookings)]
#[diesel(belongs_to(crate::models::entities::announcement::Announcement))]
pub struct Booking {
    pub id: Uuid,
    pub announcement_id: Uuid,
    pub sender_id: Uuid,
    pub traveler_id: Uuid,

    pub weight_kg: f64,
    pub description: String,
    pub declared_value: f64,
    pub insurance_opted: bool,

    pub transport_price: f64,
    pub commission_amount: f64,
    pub insurance_premium: f64,
    pub total_amount: f64,
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
    pub release_claimed_at: Option<DateTime<Utc>>,
    pub released_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_party(&self, user_id: Uuid) -> bool {
        self.sender_id == user_id || self.traveler_id == user_id
    }
}

/// Insert payload for a new booking. The store stamps id, status timestamps
/// and created/updated times; status is always `Pending` on creation.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::bookings)]
pub struct NewBooking {
    pub announcement_id: Uuid,
    pub sender_id: Uuid,
    pub traveler_id: Uuid,
    pub weight_kg: f64,
    pub description: String,
    pub declared_value: f64,
    pub insurance_opted: bool,
    pub transport_price: f64,
    pub commission_amount: f64,
    pub insurance_premium: f64,
    pub total_amount: f64,
    pub currency: CurrencyCode,
    pub status: BookingStatus,
}

impl NewBooking {
    /// Materialise the full row the way the database defaults would.
    pub fn into_booking(self) -> Booking {
        let now = Utc::now();

        Booking {
            id: Uuid::new_v4(),
            announcement_id: self.announcement_id,
            sender_id: self.sender_id,
            traveler_id: self.traveler_id,
            weight_kg: self.weight_kg,
            description: self.description,
            declared_value: self.declared_value,
            insurance_opted: self.insurance_opted,
            transport_price: self.transport_price,
            commission_amount: self.commission_amount,
            insurance_premium: self.insurance_premium,
            total_amount: self.total_amount,
            currency: self.currency,
            status: self.status,
            hold_reference: None,
            transfer_reference: None,
            refusal_reason: None,
            cancellation_reason: None,
            release_trigger: None,
            accepted_at: None,
            refused_at: None,
            cancelled_at: None,
            paid_at: None,
            in_transit_at: None,
            delivered_at: None,
            delivery_confirmed_at: None,
            release_claimed_at: None,
            released_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
