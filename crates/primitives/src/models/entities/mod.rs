pub mod announcement;
pub mod booking;
pub mod enum_types;
pub mod ledger_entry;
