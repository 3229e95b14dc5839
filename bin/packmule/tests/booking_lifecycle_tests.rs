mod common;

use common::fixtures;
use common::{bearer, sign_webhook, spawn_app, test_config};
use http::StatusCode;
use packmule_core::repositories::BookingStore;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn full_lifecycle_from_request_to_release() {
    let escrow = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/holds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "message": "hold created",
            "data": { "reference": "hold_abc", "client_secret": "sec_123" }
        })))
        .expect(1)
        .mount(&escrow)
        .await;

    Mock::given(method("POST"))
        .and(path("/transfers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "message": "transfer queued",
            "data": { "transfer_id": "tr_1" }
        })))
        .expect(1)
        .mount(&escrow)
        .await;

    let app = spawn_app(test_config(&escrow.uri(), "http://127.0.0.1:1"));

    let traveler = Uuid::new_v4();
    let sender = Uuid::new_v4();
    let announcement = fixtures::seed_announcement(&app.store, traveler, 20.0, 10.0).await;

    let sender_auth = bearer(&app.state, sender);
    let traveler_auth = bearer(&app.state, traveler);

    // sender requests 5 kg: transport 50, commission 6, total 56
    let response = app
        .server
        .post("/api/bookings")
        .add_header("Authorization", sender_auth.as_str())
        .json(&json!({
            "announcement_id": announcement.id,
            "weight_kg": 5.0,
            "declared_value": 100.0,
            "insurance_opted": false,
            "description": "Box of books"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let booking_id = body["booking_id"].as_str().unwrap().to_string();
    assert_eq!(body["status"], "pending");
    assert_eq!(body["amounts"]["transport_price"], 50.0);
    assert_eq!(body["amounts"]["commission_amount"], 6.0);
    assert_eq!(body["amounts"]["insurance_premium"], 0.0);
    assert_eq!(body["amounts"]["total_amount"], 56.0);

    // traveler accepts
    let response = app
        .server
        .post(&format!("/api/bookings/{}/accept", booking_id))
        .add_header("Authorization", traveler_auth.as_str())
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "accepted");

    // sender initiates payment; the hold is for 5600 minor units
    let response = app
        .server
        .post(&format!("/api/bookings/{}/pay", booking_id))
        .add_header("Authorization", sender_auth.as_str())
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["hold_reference"], "hold_abc");
    assert_eq!(body["client_secret"], "sec_123");
    assert_eq!(body["amount_minor"], 5600);
    assert_eq!(body["already_created"], false);

    // paying again reuses the hold instead of creating a second one
    let response = app
        .server
        .post(&format!("/api/bookings/{}/pay", booking_id))
        .add_header("Authorization", sender_auth.as_str())
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["already_created"], true);
    assert_eq!(body["hold_reference"], "hold_abc");
    assert!(body["client_secret"].is_null());

    // processor confirms the capture
    let event = json!({
        "event": "hold.captured",
        "data": {
            "booking_id": booking_id,
            "amount_minor": 5600,
            "currency": "EUR",
            "reference": "hold_abc"
        }
    });
    let raw = serde_json::to_vec(&event).unwrap();
    let response = app
        .server
        .post("/api/webhooks/escrow")
        .add_header("x-escrow-signature", sign_webhook(&raw))
        .add_header("content-type", "application/json")
        .bytes(raw.into())
        .await;
    response.assert_status(StatusCode::OK);

    let response = app
        .server
        .get(&format!("/api/bookings/{}", booking_id))
        .add_header("Authorization", sender_auth.as_str())
        .await;
    let body: Value = response.json();
    assert_eq!(body["status"], "paid");
    assert!(!body["paid_at"].is_null());

    // physical handover
    let response = app
        .server
        .post(&format!("/api/bookings/{}/transit", booking_id))
        .add_header("Authorization", traveler_auth.as_str())
        .await;
    response.assert_status(StatusCode::OK);

    let response = app
        .server
        .post(&format!("/api/bookings/{}/delivered", booking_id))
        .add_header("Authorization", traveler_auth.as_str())
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "delivered");

    // sender confirms receipt: funds move to the traveler exactly once
    let response = app
        .server
        .post(&format!("/api/bookings/{}/confirm", booking_id))
        .add_header("Authorization", sender_auth.as_str())
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["released"], true);
    assert_eq!(body["already_released"], false);
    assert_eq!(body["transfer_reference"], "tr_1");

    // final state and audit trail
    let response = app
        .server
        .get(&format!("/api/bookings/{}", booking_id))
        .add_header("Authorization", traveler_auth.as_str())
        .await;
    let body: Value = response.json();
    assert_eq!(body["status"], "released");
    assert_eq!(body["release_trigger"], "confirmation");
    assert!(!body["delivery_confirmed_at"].is_null());
    assert!(!body["released_at"].is_null());

    let response = app
        .server
        .get(&format!("/api/bookings/{}/ledger", booking_id))
        .add_header("Authorization", sender_auth.as_str())
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["entry_kind"], "capture");
    assert_eq!(entries[0]["amount_minor"], 5600);
    assert_eq!(entries[1]["entry_kind"], "transfer");
    // traveler receives the transport price; commission stays with the platform
    assert_eq!(entries[1]["amount_minor"], 5000);
}

#[tokio::test]
async fn create_booking_rejects_invalid_input() {
    let app = spawn_app(test_config("http://127.0.0.1:1", "http://127.0.0.1:1"));

    let traveler = Uuid::new_v4();
    let sender = Uuid::new_v4();
    let announcement = fixtures::seed_announcement(&app.store, traveler, 20.0, 10.0).await;
    let auth = bearer(&app.state, sender);

    // weight below the minimum
    let response = app
        .server
        .post("/api/bookings")
        .add_header("Authorization", auth.as_str())
        .json(&json!({
            "announcement_id": announcement.id,
            "weight_kg": 0.0,
            "declared_value": 100.0,
            "insurance_opted": false,
            "description": "Box"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // empty description
    let response = app
        .server
        .post("/api/bookings")
        .add_header("Authorization", auth.as_str())
        .json(&json!({
            "announcement_id": announcement.id,
            "weight_kg": 2.0,
            "declared_value": 100.0,
            "insurance_opted": false,
            "description": ""
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn traveler_cannot_book_own_announcement() {
    let app = spawn_app(test_config("http://127.0.0.1:1", "http://127.0.0.1:1"));

    let traveler = Uuid::new_v4();
    let announcement = fixtures::seed_announcement(&app.store, traveler, 20.0, 10.0).await;

    let response = app
        .server
        .post("/api/bookings")
        .add_header("Authorization", bearer(&app.state, traveler))
        .json(&json!({
            "announcement_id": announcement.id,
            "weight_kg": 2.0,
            "declared_value": 50.0,
            "insurance_opted": false,
            "description": "Box"
        }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn only_the_traveler_can_accept() {
    let app = spawn_app(test_config("http://127.0.0.1:1", "http://127.0.0.1:1"));

    let traveler = Uuid::new_v4();
    let sender = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let announcement = fixtures::seed_announcement(&app.store, traveler, 20.0, 10.0).await;
    let booking = fixtures::booking(&announcement, sender, 3.0);
    app.store.insert_booking(booking.clone()).await.unwrap();

    for actor in [sender, stranger] {
        let response = app
            .server
            .post(&format!("/api/bookings/{}/accept", booking.id))
            .add_header("Authorization", bearer(&app.state, actor))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn refusal_requires_a_reason() {
    let app = spawn_app(test_config("http://127.0.0.1:1", "http://127.0.0.1:1"));

    let traveler = Uuid::new_v4();
    let sender = Uuid::new_v4();
    let announcement = fixtures::seed_announcement(&app.store, traveler, 20.0, 10.0).await;
    let booking = fixtures::booking(&announcement, sender, 3.0);
    app.store.insert_booking(booking.clone()).await.unwrap();

    let response = app
        .server
        .post(&format!("/api/bookings/{}/refuse", booking.id))
        .add_header("Authorization", bearer(&app.state, traveler))
        .json(&json!({ "reason": "" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post(&format!("/api/bookings/{}/refuse", booking.id))
        .add_header("Authorization", bearer(&app.state, traveler))
        .json(&json!({ "reason": "No space left in my bag" }))
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "refused");
    assert_eq!(body["refusal_reason"], "No space left in my bag");
}

#[tokio::test]
async fn cancellation_is_blocked_after_payment() {
    let app = spawn_app(test_config("http://127.0.0.1:1", "http://127.0.0.1:1"));

    let traveler = Uuid::new_v4();
    let sender = Uuid::new_v4();
    let announcement = fixtures::seed_announcement(&app.store, traveler, 20.0, 10.0).await;
    let booking = fixtures::seed_paid_booking(&app.store, &announcement, sender, 3.0).await;

    let response = app
        .server
        .post(&format!("/api/bookings/{}/cancel", booking.id))
        .add_header("Authorization", bearer(&app.state, sender))
        .json(&json!({ "reason": "Changed my mind" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);

    // before payment, the sender can still cancel
    let pending = fixtures::booking(&announcement, sender, 2.0);
    app.store.insert_booking(pending.clone()).await.unwrap();

    let response = app
        .server
        .post(&format!("/api/bookings/{}/cancel", pending.id))
        .add_header("Authorization", bearer(&app.state, sender))
        .json(&json!({ "reason": "Changed my mind" }))
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "cancelled");
}

#[tokio::test]
async fn requests_without_token_are_rejected() {
    let app = spawn_app(test_config("http://127.0.0.1:1", "http://127.0.0.1:1"));

    let response = app.server.get("/api/bookings").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}
