use async_trait::async_trait;
use chrono::{DateTime, Utc};
use packmule_primitives::error::ApiError;
use packmule_primitives::models::entities::announcement::Announcement;
use packmule_primitives::models::entities::booking::{Booking, NewBooking};
use packmule_primitives::models::entities::enum_types::{BookingStatus, ReleaseTrigger};
use packmule_primitives::models::entities::ledger_entry::{LedgerEntry, NewLedgerEntry};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{BookingStore, CaptureOutcome, RefundOutcome, ReleaseClaim, Transition};

/// In-memory store with the same transition semantics as the Postgres
/// implementation. Every method runs under one mutex, which is what makes
/// the capacity check and the CAS transitions atomic here. Used by tests and
/// as an ephemeral dev backend.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    announcements: HashMap<Uuid, Announcement>,
    bookings: HashMap<Uuid, Booking>,
    ledger: Vec<LedgerEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, ApiError> {
        self.inner
            .lock()
            .map_err(|_| ApiError::Storage("memory store mutex poisoned".into()))
    }
}

fn active_weight(inner: &Inner, announcement_id: Uuid) -> f64 {
    inner
        .bookings
        .values()
        .filter(|b| b.announcement_id == announcement_id && b.status.counts_against_capacity())
        .map(|b| b.weight_kg)
        .sum()
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert_announcement(&self, announcement: Announcement) -> Result<(), ApiError> {
        let mut inner = self.lock()?;
        inner.announcements.insert(announcement.id, announcement);
        Ok(())
    }

    async fn find_announcement(&self, id: Uuid) -> Result<Option<Announcement>, ApiError> {
        let inner = self.lock()?;
        Ok(inner.announcements.get(&id).cloned())
    }

    async fn booked_weight(&self, announcement_id: Uuid) -> Result<f64, ApiError> {
        let inner = self.lock()?;
        Ok(active_weight(&inner, announcement_id))
    }

    async fn create_booking(&self, new_booking: NewBooking) -> Result<Booking, ApiError> {
        let mut inner = self.lock()?;

        let announcement = inner
            .announcements
            .get(&new_booking.announcement_id)
            .ok_or_else(|| ApiError::NotFound("Announcement not found".into()))?;
        let max_weight_kg = announcement.max_weight_kg;

        let booked = active_weight(&inner, new_booking.announcement_id);
        let available = max_weight_kg - booked;
        if new_booking.weight_kg > available {
            return Err(ApiError::CapacityExceeded {
                requested_kg: new_booking.weight_kg,
                available_kg: available,
            });
        }

        let booking = new_booking.into_booking();
        inner.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn insert_booking(&self, booking: Booking) -> Result<(), ApiError> {
        let mut inner = self.lock()?;
        inner.bookings.insert(booking.id, booking);
        Ok(())
    }

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, ApiError> {
        let inner = self.lock()?;
        Ok(inner.bookings.get(&id).cloned())
    }

    async fn bookings_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, ApiError> {
        let inner = self.lock()?;
        let mut bookings: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| b.is_party(user_id))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn count_pending_for_sender(&self, sender_id: Uuid) -> Result<i64, ApiError> {
        let inner = self.lock()?;
        Ok(inner
            .bookings
            .values()
            .filter(|b| b.sender_id == sender_id && b.status == BookingStatus::Pending)
            .count() as i64)
    }

    async fn mark_accepted(&self, id: Uuid) -> Result<Transition, ApiError> {
        let mut inner = self.lock()?;
        let Some(booking) = inner.bookings.get_mut(&id) else {
            return Ok(Transition::NotFound);
        };

        if booking.status != BookingStatus::Pending {
            return Ok(Transition::InvalidState(booking.status));
        }

        let now = Utc::now();
        booking.status = BookingStatus::Accepted;
        booking.accepted_at = Some(now);
        booking.updated_at = now;
        Ok(Transition::Applied(booking.clone()))
    }

    async fn mark_refused(&self, id: Uuid, reason: &str) -> Result<Transition, ApiError> {
        let mut inner = self.lock()?;
        let Some(booking) = inner.bookings.get_mut(&id) else {
            return Ok(Transition::NotFound);
        };

        if booking.status != BookingStatus::Pending {
            return Ok(Transition::InvalidState(booking.status));
        }

        let now = Utc::now();
        booking.status = BookingStatus::Refused;
        booking.refusal_reason = Some(reason.to_string());
        booking.refused_at = Some(now);
        booking.updated_at = now;
        Ok(Transition::Applied(booking.clone()))
    }

    async fn mark_cancelled(&self, id: Uuid, reason: &str) -> Result<Transition, ApiError> {
        let mut inner = self.lock()?;
        let Some(booking) = inner.bookings.get_mut(&id) else {
            return Ok(Transition::NotFound);
        };

        if !matches!(
            booking.status,
            BookingStatus::Pending | BookingStatus::Accepted
        ) {
            return Ok(Transition::InvalidState(booking.status));
        }

        let now = Utc::now();
        booking.status = BookingStatus::Cancelled;
        booking.cancellation_reason = Some(reason.to_string());
        booking.cancelled_at = Some(now);
        booking.updated_at = now;
        Ok(Transition::Applied(booking.clone()))
    }

    async fn mark_in_transit(&self, id: Uuid) -> Result<Transition, ApiError> {
        let mut inner = self.lock()?;
        let Some(booking) = inner.bookings.get_mut(&id) else {
            return Ok(Transition::NotFound);
        };

        if booking.status != BookingStatus::Paid {
            return Ok(Transition::InvalidState(booking.status));
        }

        let now = Utc::now();
        booking.status = BookingStatus::InTransit;
        booking.in_transit_at = Some(now);
        booking.updated_at = now;
        Ok(Transition::Applied(booking.clone()))
    }

    async fn mark_delivered(&self, id: Uuid) -> Result<Transition, ApiError> {
        let mut inner = self.lock()?;
        let Some(booking) = inner.bookings.get_mut(&id) else {
            return Ok(Transition::NotFound);
        };

        if booking.status != BookingStatus::InTransit {
            return Ok(Transition::InvalidState(booking.status));
        }

        let now = Utc::now();
        booking.status = BookingStatus::Delivered;
        booking.delivered_at = Some(now);
        booking.updated_at = now;
        Ok(Transition::Applied(booking.clone()))
    }

    async fn set_hold_reference(&self, id: Uuid, hold_reference: &str) -> Result<(), ApiError> {
        let mut inner = self.lock()?;
        let booking = inner
            .bookings
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound("Booking not found".into()))?;

        booking.hold_reference = Some(hold_reference.to_string());
        booking.updated_at = Utc::now();
        Ok(())
    }

    async fn record_capture(
        &self,
        id: Uuid,
        provider_reference: &str,
        entry: NewLedgerEntry,
    ) -> Result<CaptureOutcome, ApiError> {
        let mut inner = self.lock()?;
        let Some(booking) = inner.bookings.get_mut(&id) else {
            return Ok(CaptureOutcome::NotFound);
        };

        if booking.status == BookingStatus::Paid || booking.paid_at.is_some() {
            return Ok(CaptureOutcome::AlreadyPaid);
        }
        if booking.status != BookingStatus::Accepted {
            return Ok(CaptureOutcome::InvalidState(booking.status));
        }

        let now = Utc::now();
        booking.status = BookingStatus::Paid;
        booking.paid_at = Some(now);
        booking.hold_reference = Some(provider_reference.to_string());
        booking.updated_at = now;
        let applied = booking.clone();
        inner.ledger.push(entry.into_entry());
        Ok(CaptureOutcome::Applied(applied))
    }

    async fn record_refund(
        &self,
        id: Uuid,
        entry: NewLedgerEntry,
    ) -> Result<RefundOutcome, ApiError> {
        let mut inner = self.lock()?;
        let Some(booking) = inner.bookings.get_mut(&id) else {
            return Ok(RefundOutcome::NotFound);
        };

        if booking.status == BookingStatus::Cancelled {
            return Ok(RefundOutcome::AlreadyCancelled);
        }
        if !matches!(
            booking.status,
            BookingStatus::Paid | BookingStatus::InTransit | BookingStatus::Delivered
        ) {
            return Ok(RefundOutcome::InvalidState(booking.status));
        }

        let now = Utc::now();
        booking.status = BookingStatus::Cancelled;
        booking.cancellation_reason = Some("Payment refunded by processor".to_string());
        booking.cancelled_at = Some(now);
        booking.updated_at = now;
        let applied = booking.clone();
        inner.ledger.push(entry.into_entry());
        Ok(RefundOutcome::Applied(applied))
    }

    async fn claim_release(&self, id: Uuid) -> Result<ReleaseClaim, ApiError> {
        let mut inner = self.lock()?;
        let Some(booking) = inner.bookings.get_mut(&id) else {
            return Ok(ReleaseClaim::NotFound);
        };

        if booking.status == BookingStatus::Released || booking.released_at.is_some() {
            return Ok(ReleaseClaim::AlreadyReleased);
        }
        if booking.status != BookingStatus::Delivered {
            return Ok(ReleaseClaim::NotEligible(booking.status));
        }
        if booking.release_claimed_at.is_some() {
            return Ok(ReleaseClaim::InProgress);
        }

        booking.release_claimed_at = Some(Utc::now());
        Ok(ReleaseClaim::Claimed(booking.clone()))
    }

    async fn finish_release(
        &self,
        id: Uuid,
        trigger: ReleaseTrigger,
        transfer_reference: &str,
        entry: NewLedgerEntry,
    ) -> Result<(), ApiError> {
        let mut inner = self.lock()?;
        let booking = inner
            .bookings
            .get_mut(&id)
            .ok_or_else(|| ApiError::Internal("Claimed booking vanished".into()))?;

        let now = Utc::now();
        booking.status = BookingStatus::Released;
        booking.release_trigger = Some(trigger);
        booking.transfer_reference = Some(transfer_reference.to_string());
        booking.released_at = Some(now);
        if trigger == ReleaseTrigger::Confirmation && booking.delivery_confirmed_at.is_none() {
            booking.delivery_confirmed_at = Some(now);
        }
        booking.updated_at = now;
        inner.ledger.push(entry.into_entry());
        Ok(())
    }

    async fn abort_release(&self, id: Uuid) -> Result<(), ApiError> {
        let mut inner = self.lock()?;
        if let Some(booking) = inner.bookings.get_mut(&id) {
            if booking.released_at.is_none() {
                booking.release_claimed_at = None;
            }
        }
        Ok(())
    }

    async fn due_for_auto_release(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Booking>, ApiError> {
        let inner = self.lock()?;
        let mut due: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| {
                b.status == BookingStatus::Delivered
                    && b.released_at.is_none()
                    && b.release_claimed_at.is_none()
                    && b.delivered_at.is_some_and(|d| d <= cutoff)
            })
            .cloned()
            .collect();
        due.sort_by_key(|b| b.delivered_at);
        Ok(due)
    }

    async fn append_ledger_entry(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, ApiError> {
        let mut inner = self.lock()?;
        let entry = entry.into_entry();
        inner.ledger.push(entry.clone());
        Ok(entry)
    }

    async fn ledger_for_booking(&self, booking_id: Uuid) -> Result<Vec<LedgerEntry>, ApiError> {
        let inner = self.lock()?;
        Ok(inner
            .ledger
            .iter()
            .filter(|e| e.booking_id == booking_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use packmule_primitives::models::entities::enum_types::{
        AnnouncementStatus, CurrencyCode, EntryOutcome, LedgerEntryKind,
    };

    fn announcement(traveler_id: Uuid, max_weight_kg: f64) -> Announcement {
        let now = Utc::now();
        Announcement {
            id: Uuid::new_v4(),
            traveler_id,
            origin: "Paris".into(),
            destination: "Dakar".into(),
            departure_date: now + Duration::days(3),
            arrival_date: now + Duration::days(4),
            max_weight_kg,
            price_per_kg: 10.0,
            currency: CurrencyCode::EUR,
            status: AnnouncementStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn new_booking(announcement: &Announcement, sender_id: Uuid, weight_kg: f64) -> NewBooking {
        NewBooking {
            announcement_id: announcement.id,
            sender_id,
            traveler_id: announcement.traveler_id,
            weight_kg,
            description: "Box of books".into(),
            declared_value: 100.0,
            insurance_opted: false,
            transport_price: weight_kg * announcement.price_per_kg,
            commission_amount: weight_kg * announcement.price_per_kg * 0.12,
            insurance_premium: 0.0,
            total_amount: weight_kg * announcement.price_per_kg * 1.12,
            currency: CurrencyCode::EUR,
            status: BookingStatus::Pending,
        }
    }

    fn capture_entry(booking_id: Uuid) -> NewLedgerEntry {
        NewLedgerEntry {
            booking_id,
            entry_kind: LedgerEntryKind::Capture,
            amount_minor: 5600,
            currency: CurrencyCode::EUR,
            provider_reference: Some("hold_1".into()),
            outcome: EntryOutcome::Succeeded,
            detail: None,
        }
    }

    #[tokio::test]
    async fn create_booking_rejects_oversell() {
        let store = MemoryStore::new();
        let ann = announcement(Uuid::new_v4(), 10.0);
        store.insert_announcement(ann.clone()).await.unwrap();

        store
            .create_booking(new_booking(&ann, Uuid::new_v4(), 6.0))
            .await
            .unwrap();

        let err = store
            .create_booking(new_booking(&ann, Uuid::new_v4(), 6.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::CapacityExceeded { .. }));
    }

    #[tokio::test]
    async fn terminal_bookings_free_capacity() {
        let store = MemoryStore::new();
        let ann = announcement(Uuid::new_v4(), 10.0);
        store.insert_announcement(ann.clone()).await.unwrap();

        let b = store
            .create_booking(new_booking(&ann, Uuid::new_v4(), 8.0))
            .await
            .unwrap();
        store.mark_refused(b.id, "no room after all").await.unwrap();

        assert_eq!(store.booked_weight(ann.id).await.unwrap(), 0.0);
        store
            .create_booking(new_booking(&ann, Uuid::new_v4(), 8.0))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn accept_is_compare_and_set() {
        let store = MemoryStore::new();
        let ann = announcement(Uuid::new_v4(), 10.0);
        store.insert_announcement(ann.clone()).await.unwrap();
        let b = store
            .create_booking(new_booking(&ann, Uuid::new_v4(), 2.0))
            .await
            .unwrap();

        assert!(matches!(
            store.mark_accepted(b.id).await.unwrap(),
            Transition::Applied(_)
        ));
        // second accept hits the precondition
        assert!(matches!(
            store.mark_accepted(b.id).await.unwrap(),
            Transition::InvalidState(BookingStatus::Accepted)
        ));
        // refusing an accepted booking is illegal
        assert!(matches!(
            store.mark_refused(b.id, "too late").await.unwrap(),
            Transition::InvalidState(BookingStatus::Accepted)
        ));
    }

    #[tokio::test]
    async fn capture_applies_exactly_once() {
        let store = MemoryStore::new();
        let ann = announcement(Uuid::new_v4(), 10.0);
        store.insert_announcement(ann.clone()).await.unwrap();
        let b = store
            .create_booking(new_booking(&ann, Uuid::new_v4(), 5.0))
            .await
            .unwrap();
        store.mark_accepted(b.id).await.unwrap();

        let first = store
            .record_capture(b.id, "hold_1", capture_entry(b.id))
            .await
            .unwrap();
        assert!(matches!(first, CaptureOutcome::Applied(_)));

        let second = store
            .record_capture(b.id, "hold_1", capture_entry(b.id))
            .await
            .unwrap();
        assert!(matches!(second, CaptureOutcome::AlreadyPaid));

        let paid = store.find_booking(b.id).await.unwrap().unwrap();
        assert!(paid.paid_at.is_some());
        assert_eq!(store.ledger_for_booking(b.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn release_claim_admits_one_caller() {
        let store = MemoryStore::new();
        let ann = announcement(Uuid::new_v4(), 10.0);
        store.insert_announcement(ann.clone()).await.unwrap();
        let b = store
            .create_booking(new_booking(&ann, Uuid::new_v4(), 5.0))
            .await
            .unwrap();
        store.mark_accepted(b.id).await.unwrap();
        store
            .record_capture(b.id, "hold_1", capture_entry(b.id))
            .await
            .unwrap();
        store.mark_in_transit(b.id).await.unwrap();
        store.mark_delivered(b.id).await.unwrap();

        assert!(matches!(
            store.claim_release(b.id).await.unwrap(),
            ReleaseClaim::Claimed(_)
        ));
        assert!(matches!(
            store.claim_release(b.id).await.unwrap(),
            ReleaseClaim::InProgress
        ));

        // a failed transfer clears the claim for retry
        store.abort_release(b.id).await.unwrap();
        assert!(matches!(
            store.claim_release(b.id).await.unwrap(),
            ReleaseClaim::Claimed(_)
        ));

        let entry = NewLedgerEntry {
            booking_id: b.id,
            entry_kind: LedgerEntryKind::Transfer,
            amount_minor: 5000,
            currency: CurrencyCode::EUR,
            provider_reference: Some("tr_1".into()),
            outcome: EntryOutcome::Succeeded,
            detail: None,
        };
        store
            .finish_release(b.id, ReleaseTrigger::Confirmation, "tr_1", entry)
            .await
            .unwrap();

        assert!(matches!(
            store.claim_release(b.id).await.unwrap(),
            ReleaseClaim::AlreadyReleased
        ));

        let released = store.find_booking(b.id).await.unwrap().unwrap();
        assert_eq!(released.status, BookingStatus::Released);
        assert!(released.delivery_confirmed_at.is_some());
        assert_eq!(released.transfer_reference.as_deref(), Some("tr_1"));
    }

    #[tokio::test]
    async fn auto_release_selects_only_overdue_unclaimed() {
        let store = MemoryStore::new();
        let ann = announcement(Uuid::new_v4(), 50.0);
        store.insert_announcement(ann.clone()).await.unwrap();

        let mut overdue = new_booking(&ann, Uuid::new_v4(), 2.0).into_booking();
        overdue.status = BookingStatus::Delivered;
        overdue.delivered_at = Some(Utc::now() - Duration::days(8));
        store.insert_booking(overdue.clone()).await.unwrap();

        let mut fresh = new_booking(&ann, Uuid::new_v4(), 2.0).into_booking();
        fresh.status = BookingStatus::Delivered;
        fresh.delivered_at = Some(Utc::now() - Duration::days(2));
        store.insert_booking(fresh).await.unwrap();

        let cutoff = Utc::now() - Duration::days(7);
        let due = store.due_for_auto_release(cutoff).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, overdue.id);
    }
}
