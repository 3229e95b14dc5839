pub mod app_config;
pub mod dtos;
pub mod entities;

pub use app_config::AppConfig;
pub use entities::announcement::Announcement;
pub use entities::booking::{Booking, NewBooking};
pub use entities::enum_types::{
    AnnouncementStatus, BookingStatus, CurrencyCode, EntryOutcome, LedgerEntryKind,
    NotificationKind, ReleaseTrigger, VerificationStatus,
};
pub use entities::ledger_entry::{LedgerEntry, NewLedgerEntry};
