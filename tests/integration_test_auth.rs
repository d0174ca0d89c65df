mod common;

use axum::http::StatusCode;
use common::{test_config, TestApp};
use event_booking_backend::domain::{models::user::User, services::auth_service::AuthService};
use serde_json::json;

#[tokio::test]
async fn test_register_login_profile() {
    let app = TestApp::new().await;

    let (status, body) = app.send("POST", "/api/auth/register", None, Some(json!({
        "name": "Ada",
        "email": "Ada@Example.com",
        "password": "analytical",
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "user");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert!(body["user"].get("passwordHash").is_none());

    let (status, body) = app.send("POST", "/api/auth/login", None, Some(json!({
        "email": "ada@example.com",
        "password": "analytical",
    }))).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = app.send("GET", "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ada");
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_missing_fields() {
    let app = TestApp::new().await;
    let payload = json!({ "name": "Ada", "email": "ada@example.com", "password": "analytical" });

    let (status, _) = app.send("POST", "/api/auth/register", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.send("POST", "/api/auth/register", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already registered");

    let (status, body) = app.send("POST", "/api/auth/register", None, Some(json!({ "name": "NoMail" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");

    let (status, _) = app.send("POST", "/api/auth/register", None, Some(json!({
        "name": "Bad", "email": "not-an-email", "password": "analytical"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_cannot_claim_admin() {
    let app = TestApp::new().await;

    let (status, body) = app.send("POST", "/api/auth/register", None, Some(json!({
        "name": "Mallory", "email": "m@example.com", "password": "analytical", "role": "admin"
    }))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "user");
}

#[tokio::test]
async fn test_login_with_bad_credentials() {
    let app = TestApp::new().await;
    app.register("Ada", "user").await;

    let (status, body) = app.send("POST", "/api/auth/login", None, Some(json!({
        "email": "ghost@example.com", "password": "whatever"
    }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let (status, _) = app.send("POST", "/api/auth/login", None, Some(json!({ "email": "ghost@example.com" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_expired_token_is_reported() {
    let app = TestApp::new().await;
    let ada = app.register("Ada", "user").await;
    let user: User = app.state.user_repo.find_by_id(&ada.id).await.unwrap().unwrap();

    let mut config = test_config("memory://".into());
    config.jwt_ttl_hours = -1;
    let expired = AuthService::new(&config).issue_token(&user).unwrap();

    let (status, body) = app.send("GET", "/api/auth/profile", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token has expired. Please login again.");
}

#[tokio::test]
async fn test_malformed_json_is_a_validation_error() {
    let app = TestApp::new().await;
    let ada = app.register("Ada", "user").await;

    let response = app.send("POST", "/api/bookings", Some(&ada.token), Some(json!("just a string"))).await;
    assert_eq!(response.0, StatusCode::BAD_REQUEST);
    assert!(response.1["error"].is_string());
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, body) = app.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
