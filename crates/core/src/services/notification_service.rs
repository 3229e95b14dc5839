use crate::app_state::AppState;
use packmule_primitives::models::entities::booking::Booking;
use packmule_primitives::models::entities::enum_types::NotificationKind;

pub struct NotificationService;

impl NotificationService {
    /// Tell both parties about a booking event. Best-effort by design: the
    /// notifier logs failures and the financial transition stands either way.
    pub async fn notify_parties(state: &AppState, booking: &Booking, kind: NotificationKind) {
        let (sender_body, traveler_body) = Self::bodies(booking, kind);
        let title = Self::title(kind);

        state
            .notifier
            .notify(booking.sender_id, kind, title, &sender_body, booking.id)
            .await;
        state
            .notifier
            .notify(booking.traveler_id, kind, title, &traveler_body, booking.id)
            .await;
    }

    fn title(kind: NotificationKind) -> &'static str {
        match kind {
            NotificationKind::BookingRequested => "New booking request",
            NotificationKind::BookingAccepted => "Booking accepted",
            NotificationKind::BookingRefused => "Booking refused",
            NotificationKind::BookingCancelled => "Booking cancelled",
            NotificationKind::PaymentCaptured => "Payment received",
            NotificationKind::PaymentFailed => "Payment failed",
            NotificationKind::BookingInTransit => "Parcel in transit",
            NotificationKind::BookingDelivered => "Parcel delivered",
            NotificationKind::FundsReleased => "Funds released",
        }
    }

    fn bodies(booking: &Booking, kind: NotificationKind) -> (String, String) {
        let kg = booking.weight_kg;
        match kind {
            NotificationKind::BookingRequested => (
                format!("Your {kg} kg booking request was sent to the traveler."),
                format!("A sender requested {kg} kg of your announced capacity."),
            ),
            NotificationKind::BookingAccepted => (
                "The traveler accepted your booking. You can now pay to secure it.".into(),
                "You accepted the booking. Waiting for the sender's payment.".into(),
            ),
            NotificationKind::BookingRefused => (
                "The traveler refused your booking request.".into(),
                "You refused the booking request.".into(),
            ),
            NotificationKind::BookingCancelled => (
                "The booking was cancelled.".into(),
                "The sender cancelled the booking.".into(),
            ),
            NotificationKind::PaymentCaptured => (
                "Your payment is held in escrow until delivery is confirmed.".into(),
                "The sender paid. Funds are in escrow until delivery.".into(),
            ),
            NotificationKind::PaymentFailed => (
                "Your payment could not be processed. Please try again.".into(),
                "The sender's payment failed.".into(),
            ),
            NotificationKind::BookingInTransit => (
                "Your parcel was picked up and is in transit.".into(),
                "You confirmed pickup. Safe travels.".into(),
            ),
            NotificationKind::BookingDelivered => (
                "Your parcel was delivered. Please confirm receipt to release the funds.".into(),
                "Delivery recorded. Funds release once the sender confirms.".into(),
            ),
            NotificationKind::FundsReleased => (
                "Delivery is settled. Thank you for shipping with us.".into(),
                "The escrowed funds were transferred to your account.".into(),
            ),
        }
    }
}
