use async_trait::async_trait;
use chrono::{DateTime, Utc};
use packmule_primitives::error::ApiError;
use packmule_primitives::models::entities::announcement::Announcement;
use packmule_primitives::models::entities::booking::{Booking, NewBooking};
use packmule_primitives::models::entities::enum_types::{BookingStatus, ReleaseTrigger};
use packmule_primitives::models::entities::ledger_entry::{LedgerEntry, NewLedgerEntry};
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Result of a compare-and-set transition. A failed precondition means
/// someone else already advanced the booking; callers decide whether that is
/// an error (user action) or an idempotent no-op (processor retry).
#[derive(Debug)]
pub enum Transition {
    Applied(Booking),
    InvalidState(BookingStatus),
    NotFound,
}

/// Result of applying a capture-succeeded event.
#[derive(Debug)]
pub enum CaptureOutcome {
    Applied(Booking),
    AlreadyPaid,
    InvalidState(BookingStatus),
    NotFound,
}

/// Result of applying a refund event.
#[derive(Debug)]
pub enum RefundOutcome {
    Applied(Booking),
    AlreadyCancelled,
    InvalidState(BookingStatus),
    NotFound,
}

/// Result of claiming a booking for fund release. The claim is the
/// per-booking linearisation point; whoever gets `Claimed` performs the
/// transfer, everyone else backs off.
#[derive(Debug)]
pub enum ReleaseClaim {
    Claimed(Booking),
    AlreadyReleased,
    InProgress,
    NotEligible(BookingStatus),
    NotFound,
}

/// The single gateway to booking state. Every status change goes through a
/// conditional write here; no caller mutates rows directly, and none of
/// these methods holds a lock across a network call.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert_announcement(&self, announcement: Announcement) -> Result<(), ApiError>;

    async fn find_announcement(&self, id: Uuid) -> Result<Option<Announcement>, ApiError>;

    /// Summed weight of bookings currently holding capacity on the
    /// announcement (pending, accepted, paid, in transit).
    async fn booked_weight(&self, announcement_id: Uuid) -> Result<f64, ApiError>;

    /// Insert a new booking, enforcing announcement capacity atomically at
    /// persistence time. Fails with `CapacityExceeded` when the requested
    /// weight no longer fits.
    async fn create_booking(&self, new_booking: NewBooking) -> Result<Booking, ApiError>;

    /// Insert a fully materialised booking row (seeding and fixtures).
    async fn insert_booking(&self, booking: Booking) -> Result<(), ApiError>;

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, ApiError>;

    async fn bookings_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, ApiError>;

    async fn count_pending_for_sender(&self, sender_id: Uuid) -> Result<i64, ApiError>;

    /// `pending -> accepted`.
    async fn mark_accepted(&self, id: Uuid) -> Result<Transition, ApiError>;

    /// `pending -> refused`.
    async fn mark_refused(&self, id: Uuid, reason: &str) -> Result<Transition, ApiError>;

    /// `pending|accepted -> cancelled`; never applies once paid.
    async fn mark_cancelled(&self, id: Uuid, reason: &str) -> Result<Transition, ApiError>;

    /// `paid -> in_transit`.
    async fn mark_in_transit(&self, id: Uuid) -> Result<Transition, ApiError>;

    /// `in_transit -> delivered`.
    async fn mark_delivered(&self, id: Uuid) -> Result<Transition, ApiError>;

    /// Record the processor hold reference on an accepted booking.
    async fn set_hold_reference(&self, id: Uuid, hold_reference: &str) -> Result<(), ApiError>;

    /// Apply a capture-succeeded event: `accepted -> paid`, stamp `paid_at`,
    /// store the hold reference and append the ledger entry, atomically.
    /// A booking already paid yields `AlreadyPaid` and writes nothing.
    async fn record_capture(
        &self,
        id: Uuid,
        provider_reference: &str,
        entry: NewLedgerEntry,
    ) -> Result<CaptureOutcome, ApiError>;

    /// Apply a refund event: move a paid/in-flight booking to `cancelled`
    /// and append the refund entry atomically. Idempotent per booking.
    async fn record_refund(
        &self,
        id: Uuid,
        entry: NewLedgerEntry,
    ) -> Result<RefundOutcome, ApiError>;

    /// Claim a delivered booking for release. Exactly one concurrent caller
    /// observes `Claimed`.
    async fn claim_release(&self, id: Uuid) -> Result<ReleaseClaim, ApiError>;

    /// Finalise a claimed release: terminal status, release marker, transfer
    /// reference and the transfer ledger entry, atomically.
    async fn finish_release(
        &self,
        id: Uuid,
        trigger: ReleaseTrigger,
        transfer_reference: &str,
        entry: NewLedgerEntry,
    ) -> Result<(), ApiError>;

    /// Drop a claim after a failed transfer so the release can be retried.
    async fn abort_release(&self, id: Uuid) -> Result<(), ApiError>;

    /// Delivered bookings past the grace period with no confirmation, claim
    /// or release yet.
    async fn due_for_auto_release(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Booking>, ApiError>;

    async fn append_ledger_entry(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, ApiError>;

    async fn ledger_for_booking(&self, booking_id: Uuid) -> Result<Vec<LedgerEntry>, ApiError>;
}
