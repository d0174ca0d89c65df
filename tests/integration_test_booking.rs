mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_book_cancel_rebook_reuses_booking() {
    let app = TestApp::new().await;
    let organizer = app.register("Olga", "organizer").await;
    let alice = app.register("Alice", "user").await;
    let event_id = app.create_event(&organizer, 5).await;

    let (status, body) = app.book(&alice, &event_id).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Booking confirmed successfully");
    assert_eq!(body["booking"]["status"], "confirmed");
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();
    assert_eq!(app.bookings_count(&event_id).await, 1);

    let (status, body) = app.cancel(&alice, &booking_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["status"], "cancelled");
    assert_eq!(app.bookings_count(&event_id).await, 0);

    let (status, body) = app.book(&alice, &event_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Booking re-confirmed");
    assert_eq!(body["booking"]["id"], booking_id.as_str());
    assert_eq!(body["booking"]["status"], "confirmed");
    assert_eq!(app.bookings_count(&event_id).await, 1);
    assert_eq!(app.confirmed_count(&event_id).await, 1);
}

#[tokio::test]
async fn test_duplicate_active_booking_is_rejected() {
    let app = TestApp::new().await;
    let organizer = app.register("Olga", "organizer").await;
    let alice = app.register("Alice", "user").await;
    let event_id = app.create_event(&organizer, 5).await;

    let (status, _) = app.book(&alice, &event_id).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.book(&alice, &event_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "You already have a booking for this event.");
    assert_eq!(app.bookings_count(&event_id).await, 1);
}

#[tokio::test]
async fn test_cancel_twice_is_rejected() {
    let app = TestApp::new().await;
    let organizer = app.register("Olga", "organizer").await;
    let alice = app.register("Alice", "user").await;
    let event_id = app.create_event(&organizer, 5).await;

    let (_, body) = app.book(&alice, &event_id).await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let (status, _) = app.cancel(&alice, &booking_id).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.cancel(&alice, &booking_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Booking already cancelled.");
    assert_eq!(app.bookings_count(&event_id).await, 0);
}

#[tokio::test]
async fn test_only_owner_can_cancel() {
    let app = TestApp::new().await;
    let organizer = app.register("Olga", "organizer").await;
    let alice = app.register("Alice", "user").await;
    let mallory = app.register("Mallory", "user").await;
    let event_id = app.create_event(&organizer, 5).await;

    let (_, body) = app.book(&alice, &event_id).await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let (status, _) = app.cancel(&mallory, &booking_id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.bookings_count(&event_id).await, 1);

    let (status, _) = app.cancel(&alice, "no-such-booking").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_event_refuses_admission() {
    let app = TestApp::new().await;
    let organizer = app.register("Olga", "organizer").await;
    let alice = app.register("Alice", "user").await;
    let bob = app.register("Bob", "user").await;
    let event_id = app.create_event(&organizer, 1).await;

    let (status, _) = app.book(&alice, &event_id).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.book(&bob, &event_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Event is fully booked.");
    assert_eq!(app.bookings_count(&event_id).await, 1);
    assert!(app.state.booking_repo.find_by_user_and_event(&bob.id, &event_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_rebook_into_full_event_keeps_booking_cancelled() {
    let app = TestApp::new().await;
    let organizer = app.register("Olga", "organizer").await;
    let alice = app.register("Alice", "user").await;
    let bob = app.register("Bob", "user").await;
    let event_id = app.create_event(&organizer, 1).await;

    let (_, body) = app.book(&alice, &event_id).await;
    let alice_booking = body["booking"]["id"].as_str().unwrap().to_string();
    app.cancel(&alice, &alice_booking).await;

    let (status, _) = app.book(&bob, &event_id).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.book(&alice, &event_id).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let row = app.state.booking_repo.find_by_id(&alice_booking).await.unwrap().unwrap();
    assert!(!row.is_confirmed());
    assert_eq!(app.bookings_count(&event_id).await, 1);
    assert_eq!(app.confirmed_count(&event_id).await, 1);
}

#[tokio::test]
async fn test_past_event_cannot_be_booked() {
    let app = TestApp::new().await;
    let organizer = app.register("Olga", "organizer").await;
    let alice = app.register("Alice", "user").await;
    let event_id = app.seed_event(&organizer, Utc::now() - Duration::hours(3), 10).await;

    let (status, body) = app.book(&alice, &event_id).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cannot book an event that has already passed");
    assert_eq!(app.bookings_count(&event_id).await, 0);
}

#[tokio::test]
async fn test_booking_input_and_event_lookup_errors() {
    let app = TestApp::new().await;
    let organizer = app.register("Olga", "organizer").await;
    let alice = app.register("Alice", "user").await;

    let (status, body) = app.send("POST", "/api/bookings", Some(&alice.token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Event ID is required");

    let (status, _) = app.book(&alice, "missing-event").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let event_id = app.create_event(&organizer, 3).await;
    let (status, _) = app.send("DELETE", &format!("/api/events/{}", event_id), Some(&organizer.token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.book(&alice, &event_id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Event not found or inactive");
}

#[tokio::test]
async fn test_booking_requires_token() {
    let app = TestApp::new().await;

    let (status, _) = app.send("POST", "/api/bookings", None, Some(json!({ "eventId": "x" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send("GET", "/api/bookings/my", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
