pub mod escrow;
pub mod kyc;
pub mod notify;

pub use escrow::EscrowClient;
pub use kyc::KycClient;
pub use notify::NotifyClient;
