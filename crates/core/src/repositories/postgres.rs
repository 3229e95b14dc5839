use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use packmule_primitives::error::ApiError;
use packmule_primitives::models::entities::announcement::Announcement;
use packmule_primitives::models::entities::booking::{Booking, NewBooking};
use packmule_primitives::models::entities::enum_types::{BookingStatus, ReleaseTrigger};
use packmule_primitives::models::entities::ledger_entry::{LedgerEntry, NewLedgerEntry};
use packmule_primitives::schema::{announcements, bookings, ledger_entries};
use uuid::Uuid;

use super::{BookingStore, CaptureOutcome, RefundOutcome, ReleaseClaim, Transition};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
type DbConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Postgres-backed store. Transitions are conditional updates against the
/// current status column (`UPDATE .. WHERE status = expected`); capacity is
/// enforced under a row lock on the announcement, so racing creates
/// serialise there instead of in application memory.
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<DbConn, ApiError> {
        self.pool
            .get()
            .map_err(|e| ApiError::Storage(e.to_string()))
    }

    fn fetch(conn: &mut PgConnection, id: Uuid) -> Result<Option<Booking>, ApiError> {
        bookings::table
            .find(id)
            .first::<Booking>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    /// Resolve a failed CAS write into the caller-visible outcome.
    fn cas_miss(conn: &mut PgConnection, id: Uuid) -> Result<Transition, ApiError> {
        match Self::fetch(conn, id)? {
            Some(b) => Ok(Transition::InvalidState(b.status)),
            None => Ok(Transition::NotFound),
        }
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn insert_announcement(&self, announcement: Announcement) -> Result<(), ApiError> {
        let mut conn = self.conn()?;

        diesel::insert_into(announcements::table)
            .values(&announcement)
            .on_conflict(announcements::id)
            .do_nothing()
            .execute(&mut conn)?;
        Ok(())
    }

    async fn find_announcement(&self, id: Uuid) -> Result<Option<Announcement>, ApiError> {
        let mut conn = self.conn()?;

        announcements::table
            .find(id)
            .first::<Announcement>(&mut conn)
            .optional()
            .map_err(ApiError::from)
    }

    async fn booked_weight(&self, announcement_id: Uuid) -> Result<f64, ApiError> {
        let mut conn = self.conn()?;

        let booked: Option<f64> = bookings::table
            .filter(bookings::announcement_id.eq(announcement_id))
            .filter(bookings::status.eq_any(BookingStatus::CAPACITY_HOLDERS))
            .select(sum(bookings::weight_kg))
            .first(&mut conn)?;

        Ok(booked.unwrap_or(0.0))
    }

    async fn create_booking(&self, new_booking: NewBooking) -> Result<Booking, ApiError> {
        let mut conn = self.conn()?;

        conn.transaction::<Booking, ApiError, _>(|conn| {
            let announcement = announcements::table
                .find(new_booking.announcement_id)
                .for_update()
                .first::<Announcement>(conn)
                .optional()?
                .ok_or_else(|| ApiError::NotFound("Announcement not found".into()))?;

            let booked: Option<f64> = bookings::table
                .filter(bookings::announcement_id.eq(new_booking.announcement_id))
                .filter(bookings::status.eq_any(BookingStatus::CAPACITY_HOLDERS))
                .select(sum(bookings::weight_kg))
                .first(conn)?;

            let available = announcement.max_weight_kg - booked.unwrap_or(0.0);
            if new_booking.weight_kg > available {
                return Err(ApiError::CapacityExceeded {
                    requested_kg: new_booking.weight_kg,
                    available_kg: available,
                });
            }

            diesel::insert_into(bookings::table)
                .values(&new_booking)
                .get_result::<Booking>(conn)
                .map_err(ApiError::from)
        })
    }

    async fn insert_booking(&self, booking: Booking) -> Result<(), ApiError> {
        let mut conn = self.conn()?;

        diesel::insert_into(bookings::table)
            .values(&booking)
            .on_conflict(bookings::id)
            .do_nothing()
            .execute(&mut conn)?;
        Ok(())
    }

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, ApiError> {
        let mut conn = self.conn()?;
        Self::fetch(&mut conn, id)
    }

    async fn bookings_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, ApiError> {
        let mut conn = self.conn()?;

        bookings::table
            .filter(
                bookings::sender_id
                    .eq(user_id)
                    .or(bookings::traveler_id.eq(user_id)),
            )
            .order(bookings::created_at.desc())
            .load::<Booking>(&mut conn)
            .map_err(ApiError::from)
    }

    async fn count_pending_for_sender(&self, sender_id: Uuid) -> Result<i64, ApiError> {
        let mut conn = self.conn()?;

        bookings::table
            .filter(bookings::sender_id.eq(sender_id))
            .filter(bookings::status.eq(BookingStatus::Pending))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(ApiError::from)
    }

    async fn mark_accepted(&self, id: Uuid) -> Result<Transition, ApiError> {
        let mut conn = self.conn()?;
        let now = Utc::now();

        let updated = diesel::update(
            bookings::table
                .filter(bookings::id.eq(id))
                .filter(bookings::status.eq(BookingStatus::Pending)),
        )
        .set((
            bookings::status.eq(BookingStatus::Accepted),
            bookings::accepted_at.eq(now),
            bookings::updated_at.eq(now),
        ))
        .get_result::<Booking>(&mut conn)
        .optional()?;

        match updated {
            Some(b) => Ok(Transition::Applied(b)),
            None => Self::cas_miss(&mut conn, id),
        }
    }

    async fn mark_refused(&self, id: Uuid, reason: &str) -> Result<Transition, ApiError> {
        let mut conn = self.conn()?;
        let now = Utc::now();

        let updated = diesel::update(
            bookings::table
                .filter(bookings::id.eq(id))
                .filter(bookings::status.eq(BookingStatus::Pending)),
        )
        .set((
            bookings::status.eq(BookingStatus::Refused),
            bookings::refusal_reason.eq(reason),
            bookings::refused_at.eq(now),
            bookings::updated_at.eq(now),
        ))
        .get_result::<Booking>(&mut conn)
        .optional()?;

        match updated {
            Some(b) => Ok(Transition::Applied(b)),
            None => Self::cas_miss(&mut conn, id),
        }
    }

    async fn mark_cancelled(&self, id: Uuid, reason: &str) -> Result<Transition, ApiError> {
        let mut conn = self.conn()?;
        let now = Utc::now();

        let updated = diesel::update(
            bookings::table
                .filter(bookings::id.eq(id))
                .filter(bookings::status.eq_any([BookingStatus::Pending, BookingStatus::Accepted])),
        )
        .set((
            bookings::status.eq(BookingStatus::Cancelled),
            bookings::cancellation_reason.eq(reason),
            bookings::cancelled_at.eq(now),
            bookings::updated_at.eq(now),
        ))
        .get_result::<Booking>(&mut conn)
        .optional()?;

        match updated {
            Some(b) => Ok(Transition::Applied(b)),
            None => Self::cas_miss(&mut conn, id),
        }
    }

    async fn mark_in_transit(&self, id: Uuid) -> Result<Transition, ApiError> {
        let mut conn = self.conn()?;
        let now = Utc::now();

        let updated = diesel::update(
            bookings::table
                .filter(bookings::id.eq(id))
                .filter(bookings::status.eq(BookingStatus::Paid)),
        )
        .set((
            bookings::status.eq(BookingStatus::InTransit),
            bookings::in_transit_at.eq(now),
            bookings::updated_at.eq(now),
        ))
        .get_result::<Booking>(&mut conn)
        .optional()?;

        match updated {
            Some(b) => Ok(Transition::Applied(b)),
            None => Self::cas_miss(&mut conn, id),
        }
    }

    async fn mark_delivered(&self, id: Uuid) -> Result<Transition, ApiError> {
        let mut conn = self.conn()?;
        let now = Utc::now();

        let updated = diesel::update(
            bookings::table
                .filter(bookings::id.eq(id))
                .filter(bookings::status.eq(BookingStatus::InTransit)),
        )
        .set((
            bookings::status.eq(BookingStatus::Delivered),
            bookings::delivered_at.eq(now),
            bookings::updated_at.eq(now),
        ))
        .get_result::<Booking>(&mut conn)
        .optional()?;

        match updated {
            Some(b) => Ok(Transition::Applied(b)),
            None => Self::cas_miss(&mut conn, id),
        }
    }

    async fn set_hold_reference(&self, id: Uuid, hold_reference: &str) -> Result<(), ApiError> {
        let mut conn = self.conn()?;

        let affected = diesel::update(bookings::table.find(id))
            .set((
                bookings::hold_reference.eq(hold_reference),
                bookings::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        if affected == 0 {
            return Err(ApiError::NotFound("Booking not found".into()));
        }
        Ok(())
    }

    async fn record_capture(
        &self,
        id: Uuid,
        provider_reference: &str,
        entry: NewLedgerEntry,
    ) -> Result<CaptureOutcome, ApiError> {
        let mut conn = self.conn()?;

        conn.transaction::<CaptureOutcome, ApiError, _>(|conn| {
            let Some(booking) = bookings::table
                .find(id)
                .for_update()
                .first::<Booking>(conn)
                .optional()?
            else {
                return Ok(CaptureOutcome::NotFound);
            };

            if booking.status == BookingStatus::Paid || booking.paid_at.is_some() {
                return Ok(CaptureOutcome::AlreadyPaid);
            }
            if booking.status != BookingStatus::Accepted {
                return Ok(CaptureOutcome::InvalidState(booking.status));
            }

            let now = Utc::now();
            let updated = diesel::update(bookings::table.find(id))
                .set((
                    bookings::status.eq(BookingStatus::Paid),
                    bookings::paid_at.eq(now),
                    bookings::hold_reference.eq(provider_reference),
                    bookings::updated_at.eq(now),
                ))
                .get_result::<Booking>(conn)?;

            diesel::insert_into(ledger_entries::table)
                .values(&entry)
                .execute(conn)?;

            Ok(CaptureOutcome::Applied(updated))
        })
    }

    async fn record_refund(
        &self,
        id: Uuid,
        entry: NewLedgerEntry,
    ) -> Result<RefundOutcome, ApiError> {
        let mut conn = self.conn()?;

        conn.transaction::<RefundOutcome, ApiError, _>(|conn| {
            let Some(booking) = bookings::table
                .find(id)
                .for_update()
                .first::<Booking>(conn)
                .optional()?
            else {
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
            let updated = diesel::update(bookings::table.find(id))
                .set((
                    bookings::status.eq(BookingStatus::Cancelled),
                    bookings::cancellation_reason.eq("Payment refunded by processor"),
                    bookings::cancelled_at.eq(now),
                    bookings::updated_at.eq(now),
                ))
                .get_result::<Booking>(conn)?;

            diesel::insert_into(ledger_entries::table)
                .values(&entry)
                .execute(conn)?;

            Ok(RefundOutcome::Applied(updated))
        })
    }

    async fn claim_release(&self, id: Uuid) -> Result<ReleaseClaim, ApiError> {
        let mut conn = self.conn()?;

        conn.transaction::<ReleaseClaim, ApiError, _>(|conn| {
            let Some(booking) = bookings::table
                .find(id)
                .for_update()
                .first::<Booking>(conn)
                .optional()?
            else {
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

            let claimed = diesel::update(bookings::table.find(id))
                .set(bookings::release_claimed_at.eq(Utc::now()))
                .get_result::<Booking>(conn)?;

            Ok(ReleaseClaim::Claimed(claimed))
        })
    }

    async fn finish_release(
        &self,
        id: Uuid,
        trigger: ReleaseTrigger,
        transfer_reference: &str,
        entry: NewLedgerEntry,
    ) -> Result<(), ApiError> {
        let mut conn = self.conn()?;

        conn.transaction::<(), ApiError, _>(|conn| {
            let booking = bookings::table
                .find(id)
                .for_update()
                .first::<Booking>(conn)
                .optional()?
                .ok_or_else(|| ApiError::Internal("Claimed booking vanished".into()))?;

            let now = Utc::now();
            let confirmed_at = if trigger == ReleaseTrigger::Confirmation {
                booking.delivery_confirmed_at.or(Some(now))
            } else {
                booking.delivery_confirmed_at
            };

            diesel::update(bookings::table.find(id))
                .set((
                    bookings::status.eq(BookingStatus::Released),
                    bookings::release_trigger.eq(trigger),
                    bookings::transfer_reference.eq(transfer_reference),
                    bookings::delivery_confirmed_at.eq(confirmed_at),
                    bookings::released_at.eq(now),
                    bookings::updated_at.eq(now),
                ))
                .execute(conn)?;

            diesel::insert_into(ledger_entries::table)
                .values(&entry)
                .execute(conn)?;

            Ok(())
        })
    }

    async fn abort_release(&self, id: Uuid) -> Result<(), ApiError> {
        let mut conn = self.conn()?;

        diesel::update(
            bookings::table
                .filter(bookings::id.eq(id))
                .filter(bookings::released_at.is_null()),
        )
        .set(bookings::release_claimed_at.eq(None::<DateTime<Utc>>))
        .execute(&mut conn)?;

        Ok(())
    }

    async fn due_for_auto_release(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Booking>, ApiError> {
        let mut conn = self.conn()?;

        bookings::table
            .filter(bookings::status.eq(BookingStatus::Delivered))
            .filter(bookings::released_at.is_null())
            .filter(bookings::release_claimed_at.is_null())
            .filter(bookings::delivered_at.is_not_null())
            .filter(bookings::delivered_at.le(cutoff))
            .order(bookings::delivered_at.asc())
            .load::<Booking>(&mut conn)
            .map_err(ApiError::from)
    }

    async fn append_ledger_entry(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, ApiError> {
        let mut conn = self.conn()?;

        diesel::insert_into(ledger_entries::table)
            .values(&entry)
            .get_result::<LedgerEntry>(&mut conn)
            .map_err(ApiError::from)
    }

    async fn ledger_for_booking(&self, booking_id: Uuid) -> Result<Vec<LedgerEntry>, ApiError> {
        let mut conn = self.conn()?;

        ledger_entries::table
            .filter(ledger_entries::booking_id.eq(booking_id))
            .order(ledger_entries::created_at.asc())
            .load::<LedgerEntry>(&mut conn)
            .map_err(ApiError::from)
    }
}
