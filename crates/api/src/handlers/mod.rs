pub mod accept_booking;
pub mod announcement_availability;
pub mod booking_ledger;
pub mod cancel_booking;
pub mod confirm_delivery;
pub mod create_booking;
pub mod escrow_webhook;
pub mod get_booking;
pub mod health;
pub mod initiate_payment;
pub mod list_bookings;
pub mod mark_delivered;
pub mod mark_in_transit;
pub mod refuse_booking;
pub mod release_sweep;
