use crate::models::entities::enum_types::{AnnouncementStatus, CurrencyCode};
use chrono::{DateTime, Utc};
use diesel::{Identifiable, Insertable, Queryable};
use serde::Serialize;
use uuid::Uuid;

/// A traveler's posted trip offering carrying capacity. Capacity is never
/// decremented here; remaining weight is derived from the bookings that
/// reference the announcement.
#[derive(Debug, Clone, Queryable, Identifiable, Insertable, Serialize)]
#[diesel(table_name = crate::schema::announcements)]
pub struct Announcement {
    pub id: Uuid,
    pub traveler_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub departure_date: DateTime<Utc>,
    pub arrival_date: DateTime<Utc>,
    pub max_weight_kg: f64,
    pub price_per_kg: f64,
    pub currency: CurrencyCode,
    pub status: AnnouncementStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Announcement {
    pub fn is_bookable(&self) -> bool {
        self.status == AnnouncementStatus::Active
    }
}
