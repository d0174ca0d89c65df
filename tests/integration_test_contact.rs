mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_guest_can_send_message() {
    let app = TestApp::new().await;

    let (status, body) = app.send("POST", "/api/contact", None, Some(json!({
        "name": "Guest",
        "email": "guest@example.com",
        "message": "Is there parking near the venue?"
    }))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Guest");
    assert_eq!(body["message"], "Message sent successfully!");
}

#[tokio::test]
async fn test_signed_in_sender_uses_account_identity() {
    let app = TestApp::new().await;
    let alice = app.register("Alice", "user").await;

    let (status, body) = app.send("POST", "/api/contact", Some(&alice.token), Some(json!({
        "name": "Someone Else",
        "email": "spoof@example.com",
        "message": "Please resend my ticket."
    }))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Alice");
    assert!(body["data"]["email"].as_str().unwrap().starts_with("alice-"));
}

#[tokio::test]
async fn test_contact_validation() {
    let app = TestApp::new().await;

    let cases = vec![
        json!({ "name": "Guest", "email": "guest@example.com", "message": "short" }),
        json!({ "name": "G", "email": "guest@example.com", "message": "Long enough message" }),
        json!({ "name": "Guest", "email": "guest-at-example", "message": "Long enough message" }),
        json!({ "name": "Guest", "email": "guest@example.com" }),
    ];

    for payload in cases {
        let (status, _) = app.send("POST", "/api/contact", None, Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
    }
}

#[tokio::test]
async fn test_only_admin_reads_messages() {
    let app = TestApp::new().await;
    let alice = app.register("Alice", "user").await;
    let admin = app.admin().await;

    for text in ["First question here", "Second question here"] {
        let (status, _) = app.send("POST", "/api/contact", Some(&alice.token), Some(json!({ "message": text }))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = app.send("GET", "/api/contact", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send("GET", "/api/contact", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.send("GET", "/api/contact", Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    let messages = body.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["message"], "Second question here");
}
