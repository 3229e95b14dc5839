use chrono::{DateTime, Duration, Utc};
use packmule_core::repositories::{BookingStore, MemoryStore};
use packmule_primitives::models::entities::announcement::Announcement;
use packmule_primitives::models::entities::booking::{Booking, NewBooking};
use packmule_primitives::models::entities::enum_types::{
    AnnouncementStatus, BookingStatus, CurrencyCode,
};
use uuid::Uuid;

pub fn announcement(traveler_id: Uuid, max_weight_kg: f64, price_per_kg: f64) -> Announcement {
    let now = Utc::now();
    Announcement {
        id: Uuid::new_v4(),
        traveler_id,
        origin: "Paris".to_string(),
        destination: "Dakar".to_string(),
        departure_date: now + Duration::days(3),
        arrival_date: now + Duration::days(4),
        max_weight_kg,
        price_per_kg,
        currency: CurrencyCode::EUR,
        status: AnnouncementStatus::Active,
        created_at: now,
        updated_at: now,
    }
}

pub async fn seed_announcement(
    store: &MemoryStore,
    traveler_id: Uuid,
    max_weight_kg: f64,
    price_per_kg: f64,
) -> Announcement {
    let announcement = self::announcement(traveler_id, max_weight_kg, price_per_kg);
    store
        .insert_announcement(announcement.clone())
        .await
        .expect("Failed to seed announcement");
    announcement
}

/// A quoted booking row with commission at 12% and no insurance.
pub fn booking(announcement: &Announcement, sender_id: Uuid, weight_kg: f64) -> Booking {
    let transport_price = weight_kg * announcement.price_per_kg;
    NewBooking {
        announcement_id: announcement.id,
        sender_id,
        traveler_id: announcement.traveler_id,
        weight_kg,
        description: "Box of books".to_string(),
        declared_value: 100.0,
        insurance_opted: false,
        transport_price,
        commission_amount: transport_price * 0.12,
        insurance_premium: 0.0,
        total_amount: transport_price * 1.12,
        currency: CurrencyCode::EUR,
        status: BookingStatus::Pending,
    }
    .into_booking()
}

pub async fn seed_accepted_booking(
    store: &MemoryStore,
    announcement: &Announcement,
    sender_id: Uuid,
    weight_kg: f64,
) -> Booking {
    let mut booking = self::booking(announcement, sender_id, weight_kg);
    booking.status = BookingStatus::Accepted;
    booking.accepted_at = Some(Utc::now());
    store
        .insert_booking(booking.clone())
        .await
        .expect("Failed to seed booking");
    booking
}

pub async fn seed_paid_booking(
    store: &MemoryStore,
    announcement: &Announcement,
    sender_id: Uuid,
    weight_kg: f64,
) -> Booking {
    let now = Utc::now();
    let mut booking = self::booking(announcement, sender_id, weight_kg);
    booking.status = BookingStatus::Paid;
    booking.accepted_at = Some(now);
    booking.paid_at = Some(now);
    booking.hold_reference = Some("hold_seeded".to_string());
    store
        .insert_booking(booking.clone())
        .await
        .expect("Failed to seed booking");
    booking
}

pub async fn seed_delivered_booking(
    store: &MemoryStore,
    announcement: &Announcement,
    sender_id: Uuid,
    weight_kg: f64,
    delivered_at: DateTime<Utc>,
) -> Booking {
    let mut booking = self::booking(announcement, sender_id, weight_kg);
    booking.status = BookingStatus::Delivered;
    booking.accepted_at = Some(delivered_at - Duration::days(2));
    booking.paid_at = Some(delivered_at - Duration::days(2));
    booking.in_transit_at = Some(delivered_at - Duration::days(1));
    booking.delivered_at = Some(delivered_at);
    booking.hold_reference = Some("hold_seeded".to_string());
    store
        .insert_booking(booking.clone())
        .await
        .expect("Failed to seed booking");
    booking
}
