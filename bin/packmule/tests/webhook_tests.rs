mod common;

use common::fixtures;
use common::{sign_webhook, spawn_app, test_config};
use http::StatusCode;
use packmule_core::repositories::BookingStore;
use serde_json::json;
use uuid::Uuid;

fn capture_event(booking_id: Uuid, reference: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "event": "hold.captured",
        "data": {
            "booking_id": booking_id,
            "amount_minor": 3360,
            "currency": "EUR",
            "reference": reference
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn webhook_rejects_bad_signature() {
    let app = spawn_app(test_config("http://127.0.0.1:1", "http://127.0.0.1:1"));

    let raw = capture_event(Uuid::new_v4(), "hold_1");

    let response = app
        .server
        .post("/api/webhooks/escrow")
        .add_header("x-escrow-signature", "deadbeef")
        .add_header("content-type", "application/json")
        .bytes(raw.clone().into())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/api/webhooks/escrow")
        .add_header("content-type", "application/json")
        .bytes(raw.into())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_capture_marks_paid_exactly_once() {
    let app = spawn_app(test_config("http://127.0.0.1:1", "http://127.0.0.1:1"));

    let traveler = Uuid::new_v4();
    let sender = Uuid::new_v4();
    let announcement = fixtures::seed_announcement(&app.store, traveler, 20.0, 10.0).await;
    let booking = fixtures::seed_accepted_booking(&app.store, &announcement, sender, 3.0).await;

    let raw = capture_event(booking.id, "hold_dup");

    for _ in 0..2 {
        let response = app
            .server
            .post("/api/webhooks/escrow")
            .add_header("x-escrow-signature", sign_webhook(&raw))
            .add_header("content-type", "application/json")
            .bytes(raw.clone().into())
            .await;
        response.assert_status(StatusCode::OK);
    }

    let paid = app.store.find_booking(booking.id).await.unwrap().unwrap();
    assert!(paid.paid_at.is_some());
    assert_eq!(paid.hold_reference.as_deref(), Some("hold_dup"));

    // exactly one capture entry despite the duplicate delivery
    let entries = app.store.ledger_for_booking(booking.id).await.unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn failed_capture_keeps_booking_accepted() {
    let app = spawn_app(test_config("http://127.0.0.1:1", "http://127.0.0.1:1"));

    let traveler = Uuid::new_v4();
    let sender = Uuid::new_v4();
    let announcement = fixtures::seed_announcement(&app.store, traveler, 20.0, 10.0).await;
    let booking = fixtures::seed_accepted_booking(&app.store, &announcement, sender, 3.0).await;

    let raw = serde_json::to_vec(&json!({
        "event": "hold.capture_failed",
        "data": {
            "booking_id": booking.id,
            "amount_minor": 3360,
            "currency": "EUR",
            "reference": "hold_fail",
            "reason": "card_declined"
        }
    }))
    .unwrap();

    let response = app
        .server
        .post("/api/webhooks/escrow")
        .add_header("x-escrow-signature", sign_webhook(&raw))
        .add_header("content-type", "application/json")
        .bytes(raw.into())
        .await;
    response.assert_status(StatusCode::OK);

    let unchanged = app.store.find_booking(booking.id).await.unwrap().unwrap();
    assert!(unchanged.paid_at.is_none());
    assert_eq!(
        unchanged.status,
        packmule_primitives::models::BookingStatus::Accepted
    );

    let entries = app.store.ledger_for_booking(booking.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].outcome,
        packmule_primitives::models::EntryOutcome::Failed
    );
    assert_eq!(entries[0].detail.as_deref(), Some("card_declined"));
}

#[tokio::test]
async fn refund_cancels_a_paid_booking_idempotently() {
    let app = spawn_app(test_config("http://127.0.0.1:1", "http://127.0.0.1:1"));

    let traveler = Uuid::new_v4();
    let sender = Uuid::new_v4();
    let announcement = fixtures::seed_announcement(&app.store, traveler, 20.0, 10.0).await;
    let booking = fixtures::seed_paid_booking(&app.store, &announcement, sender, 3.0).await;

    let raw = serde_json::to_vec(&json!({
        "event": "hold.refunded",
        "data": {
            "booking_id": booking.id,
            "amount_minor": 3360,
            "currency": "EUR",
            "reference": "hold_seeded",
            "reason": "dispute"
        }
    }))
    .unwrap();

    for _ in 0..2 {
        let response = app
            .server
            .post("/api/webhooks/escrow")
            .add_header("x-escrow-signature", sign_webhook(&raw))
            .add_header("content-type", "application/json")
            .bytes(raw.clone().into())
            .await;
        response.assert_status(StatusCode::OK);
    }

    let cancelled = app.store.find_booking(booking.id).await.unwrap().unwrap();
    assert_eq!(
        cancelled.status,
        packmule_primitives::models::BookingStatus::Cancelled
    );
    assert!(cancelled.cancelled_at.is_some());

    let entries = app.store.ledger_for_booking(booking.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].entry_kind,
        packmule_primitives::models::LedgerEntryKind::Refund
    );
}

#[tokio::test]
async fn capture_before_acceptance_is_acknowledged_without_effect() {
    let app = spawn_app(test_config("http://127.0.0.1:1", "http://127.0.0.1:1"));

    let traveler = Uuid::new_v4();
    let sender = Uuid::new_v4();
    let announcement = fixtures::seed_announcement(&app.store, traveler, 20.0, 10.0).await;
    let booking = fixtures::booking(&announcement, sender, 3.0);
    app.store.insert_booking(booking.clone()).await.unwrap();

    let raw = capture_event(booking.id, "hold_early");

    let response = app
        .server
        .post("/api/webhooks/escrow")
        .add_header("x-escrow-signature", sign_webhook(&raw))
        .add_header("content-type", "application/json")
        .bytes(raw.into())
        .await;
    response.assert_status(StatusCode::OK);

    let unchanged = app.store.find_booking(booking.id).await.unwrap().unwrap();
    assert_eq!(
        unchanged.status,
        packmule_primitives::models::BookingStatus::Pending
    );
    assert!(unchanged.paid_at.is_none());
    assert!(app
        .store
        .ledger_for_booking(booking.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn unknown_events_and_unknown_bookings_are_acknowledged() {
    let app = spawn_app(test_config("http://127.0.0.1:1", "http://127.0.0.1:1"));

    // an event kind added by the processor after this build
    let raw = serde_json::to_vec(&json!({
        "event": "hold.expired",
        "data": {
            "booking_id": Uuid::new_v4(),
            "amount_minor": 100,
            "currency": "EUR",
            "reference": "hold_x"
        }
    }))
    .unwrap();

    let response = app
        .server
        .post("/api/webhooks/escrow")
        .add_header("x-escrow-signature", sign_webhook(&raw))
        .add_header("content-type", "application/json")
        .bytes(raw.into())
        .await;
    response.assert_status(StatusCode::OK);

    // a capture for a booking this platform has never seen
    let raw = capture_event(Uuid::new_v4(), "hold_missing");
    let response = app
        .server
        .post("/api/webhooks/escrow")
        .add_header("x-escrow-signature", sign_webhook(&raw))
        .add_header("content-type", "application/json")
        .bytes(raw.into())
        .await;
    response.assert_status(StatusCode::OK);
}
