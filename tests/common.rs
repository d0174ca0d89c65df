#![allow(dead_code)]

use event_booking_backend::{
    api::router::create_router,
    config::Config,
    domain::models::{
        event::{Event, NewEventParams},
        user::User,
    },
    infra::factory::{bootstrap_state, Store},
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789";

pub fn test_config(database_url: String) -> Config {
    Config {
        database_url,
        port: 0,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_ttl_hours: 1,
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

pub struct TestUser {
    pub id: String,
    pub token: String,
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub store: Store,
    pub db_filename: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let config = test_config(format!("sqlite://{}", db_filename));

        let (state, store) = bootstrap_state(&config)
            .await
            .expect("Failed to bootstrap test state");
        let state = Arc::new(state);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            store,
            db_filename,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn register(&self, name: &str, role: &str) -> TestUser {
        let (status, body) = self.send("POST", "/api/auth/register", None, Some(json!({
            "name": name,
            "email": format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4()),
            "password": "correct-horse",
            "role": role
        }))).await;

        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        TestUser {
            id: body["user"]["id"].as_str().unwrap().to_string(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Admins cannot self-register, so they are written straight to the store.
    pub async fn admin(&self) -> TestUser {
        let mut user = User::new("Root".into(), format!("root-{}@example.com", Uuid::new_v4()), "unused".into(), None);
        user.role = "admin".into();
        let user = self.state.user_repo.create(&user).await.unwrap();

        TestUser {
            token: self.state.auth_service.issue_token(&user).unwrap(),
            id: user.id,
        }
    }

    pub async fn create_event(&self, organizer: &TestUser, capacity: i32) -> String {
        let (status, body) = self.send("POST", "/api/events", Some(&organizer.token), Some(json!({
            "title": "RustConf Workshop",
            "description": "Hands-on async Rust for a full afternoon",
            "date": (Utc::now() + Duration::days(10)).to_rfc3339(),
            "location": "Main Hall",
            "capacity": capacity
        }))).await;

        assert_eq!(status, StatusCode::CREATED, "create event failed: {}", body);
        body["event"]["id"].as_str().unwrap().to_string()
    }

    /// Writes an event directly, bypassing the date rule on creation.
    pub async fn seed_event(&self, organizer: &TestUser, date: DateTime<Utc>, capacity: i32) -> String {
        let event = Event::new(NewEventParams {
            title: "Seeded event".into(),
            description: "Inserted straight into the store".into(),
            date,
            location: "Archive".into(),
            image: None,
            capacity: Some(capacity),
            organizer_id: organizer.id.clone(),
        });
        self.state.event_repo.create(&event).await.unwrap().id
    }

    pub async fn book(&self, user: &TestUser, event_id: &str) -> (StatusCode, Value) {
        self.send("POST", "/api/bookings", Some(&user.token), Some(json!({ "eventId": event_id }))).await
    }

    pub async fn cancel(&self, user: &TestUser, booking_id: &str) -> (StatusCode, Value) {
        self.send("PUT", &format!("/api/bookings/{}/cancel", booking_id), Some(&user.token), None).await
    }

    pub async fn bookings_count(&self, event_id: &str) -> i32 {
        self.state.event_repo.find_by_id(event_id).await.unwrap().unwrap().bookings_count
    }

    pub async fn confirmed_count(&self, event_id: &str) -> i64 {
        self.state.booking_repo.count_confirmed(event_id).await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", self.db_filename, suffix));
        }
    }
}
