pub mod booking_service;
pub mod capacity_service;
pub mod notification_service;
pub mod payment_service;
pub mod pricing_service;
pub mod settlement_service;
pub mod webhook_service;
